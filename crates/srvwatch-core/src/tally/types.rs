use crate::records::{ServerId, Status};
use serde::Serialize;
use std::collections::BTreeMap;

/// OK/WARN/ERROR counts, in canonical column order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    #[serde(rename = "OK")]
    pub ok: u64,
    #[serde(rename = "WARN")]
    pub warn: u64,
    #[serde(rename = "ERROR")]
    pub error: u64,
}

impl StatusCounts {
    pub fn new(ok: u64, warn: u64, error: u64) -> Self {
        Self { ok, warn, error }
    }

    /// Count for a known status; unknown statuses have no column.
    pub fn get(&self, status: &Status) -> Option<u64> {
        match status {
            Status::Ok => Some(self.ok),
            Status::Warn => Some(self.warn),
            Status::Error => Some(self.error),
            Status::Other(_) => None,
        }
    }

    /// Returns false for unknown statuses, which are not counted.
    pub fn record(&mut self, status: &Status) -> bool {
        match status {
            Status::Ok => self.ok += 1,
            Status::Warn => self.warn += 1,
            Status::Error => self.error += 1,
            Status::Other(_) => return false,
        }
        true
    }

    /// Columns as `(status, count)` in canonical order.
    pub fn columns(&self) -> [(Status, u64); 3] {
        [
            (Status::Ok, self.ok),
            (Status::Warn, self.warn),
            (Status::Error, self.error),
        ]
    }

    pub fn total(&self) -> u64 {
        self.ok + self.warn + self.error
    }
}

impl std::ops::AddAssign for StatusCounts {
    fn add_assign(&mut self, other: Self) {
        self.ok += other.ok;
        self.warn += other.warn;
        self.error += other.error;
    }
}

/// Column sums of a [`StatusTally`].
pub type StatusTotals = StatusCounts;

/// One tally row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TallyRow {
    pub server_id: ServerId,
    #[serde(flatten)]
    pub counts: StatusCounts,
}

/// Per-server status counts for one batch, rows sorted by server id.
///
/// The schema is the same for every batch: an empty batch gives zero rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTally {
    rows: BTreeMap<ServerId, StatusCounts>,
    /// Records whose status has no column.
    unknown_statuses: u64,
}

impl StatusTally {
    pub(crate) fn from_parts(rows: BTreeMap<ServerId, StatusCounts>, unknown_statuses: u64) -> Self {
        Self {
            rows,
            unknown_statuses,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, server_id: &ServerId) -> Option<&StatusCounts> {
        self.rows.get(server_id)
    }

    /// Rows in server id order.
    pub fn rows(&self) -> impl Iterator<Item = TallyRow> + '_ {
        self.rows.iter().map(|(server_id, counts)| TallyRow {
            server_id: server_id.clone(),
            counts: *counts,
        })
    }

    pub fn server_ids(&self) -> impl Iterator<Item = &ServerId> {
        self.rows.keys()
    }

    pub fn unknown_statuses(&self) -> u64 {
        self.unknown_statuses
    }

    /// Sum of each status column across all servers.
    pub fn totals(&self) -> StatusTotals {
        let mut totals = StatusTotals::default();
        for counts in self.rows.values() {
            totals += *counts;
        }
        totals
    }

    /// Highest single cell, used to scale charts.
    pub fn max_count(&self) -> u64 {
        self.rows
            .values()
            .flat_map(|c| [c.ok, c.warn, c.error])
            .max()
            .unwrap_or(0)
    }
}

impl Serialize for StatusTally {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}
