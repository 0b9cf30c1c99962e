use crate::errors::SrvwatchError;
use crate::records::Record;
use crate::refresh::errors::{FetchError, Severity};
use crate::refresh::session::RefreshSession;
use crate::store::ObjectStore;
use crate::tally::{StatusTally, StatusTotals, aggregate};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

pub const EMPTY_BATCH_CODE: &str = "EMPTY_BATCH";

/// Message shown next to the dashboard when there is nothing to tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
}

impl From<&FetchError> for Notice {
    fn from(error: &FetchError) -> Self {
        Self {
            severity: error.severity(),
            code: error.error_code(),
            message: error.to_string(),
        }
    }
}

/// Everything the presentation layer gets for one cycle.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub cycle: u64,
    pub location: String,
    /// Last forced refresh, or session start.
    pub last_refresh: DateTime<Utc>,
    pub rendered_at: DateTime<Utc>,
    pub cache_hit: bool,
    pub batch_size: usize,
    pub totals: StatusTotals,
    pub tally: StatusTally,
    pub tail: Vec<Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_refresh_secs: Option<u64>,
}

/// One fetch + aggregate pass, packaged for rendering.
pub fn run_cycle<S: ObjectStore + ?Sized>(
    session: &mut RefreshSession,
    store: &S,
    tail_rows: usize,
    cycle: u64,
) -> DashboardView {
    let fetched = session.fetch_batch(store);
    let tally = aggregate(&fetched.batch);
    let totals = tally.totals();

    let notice = match &fetched.error {
        Some(error) => Some(Notice::from(error)),
        None if fetched.batch.is_empty() => Some(Notice {
            severity: Severity::Warning,
            code: EMPTY_BATCH_CODE,
            message: "No status records found; check the source and its contents".to_string(),
        }),
        None => None,
    };

    info!(
        event = "core.refresh.cycle_completed",
        cycle = cycle,
        records = fetched.batch.len(),
        servers = tally.len(),
        ok = totals.ok,
        warn = totals.warn,
        error = totals.error,
        cache_hit = fetched.cache_hit
    );

    DashboardView {
        cycle,
        location: store.describe(),
        last_refresh: session.last_forced_refresh(),
        rendered_at: Utc::now(),
        cache_hit: fetched.cache_hit,
        batch_size: fetched.batch.len(),
        totals,
        tail: fetched.batch.tail(tail_rows).to_vec(),
        tally,
        notice,
        next_refresh_secs: None,
    }
}
