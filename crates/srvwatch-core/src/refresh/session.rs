//! Refresh state owned by one dashboard session.
//!
//! The session holds the refresh key and a single memoized batch. A memoized
//! batch is reused only while the key is unchanged and the entry is younger
//! than the TTL. [`RefreshSession::force_refresh`] changes the key, so the
//! next fetch always goes back to the store.

use crate::records::Batch;
use crate::refresh::errors::{FetchError, Severity};
use crate::refresh::fetch::{FetchSource, load_batch};
use crate::store::ObjectStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Identity of the data an operator last asked for.
///
/// The generation makes two forced refreshes within the same clock tick
/// still distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshKey {
    pub generation: u64,
    pub forced_at: DateTime<Utc>,
}

#[derive(Debug)]
struct MemoEntry {
    key: RefreshKey,
    fetched_at: Instant,
    batch: Arc<Batch>,
}

/// Result of [`RefreshSession::fetch_batch`]. Never an `Err`: a failed
/// fetch yields an empty batch plus the error to show.
#[derive(Debug)]
pub struct Fetched {
    pub batch: Arc<Batch>,
    pub error: Option<FetchError>,
    pub cache_hit: bool,
}

#[derive(Debug)]
pub struct RefreshSession {
    source: FetchSource,
    ttl: Duration,
    key: RefreshKey,
    memo: Option<MemoEntry>,
}

impl RefreshSession {
    pub fn new(source: FetchSource, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            key: RefreshKey {
                generation: 0,
                forced_at: Utc::now(),
            },
            memo: None,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn key(&self) -> &RefreshKey {
        &self.key
    }

    /// When the operator last forced a refresh (session start if never).
    pub fn last_forced_refresh(&self) -> DateTime<Utc> {
        self.key.forced_at
    }

    /// Replace the refresh key so the next fetch bypasses the memo.
    pub fn force_refresh(&mut self) -> &RefreshKey {
        self.key = RefreshKey {
            generation: self.key.generation + 1,
            forced_at: Utc::now(),
        };

        info!(
            event = "core.refresh.forced",
            generation = self.key.generation,
            forced_at = %self.key.forced_at
        );

        &self.key
    }

    /// Fetch the current batch, reusing the memo when allowed.
    pub fn fetch_batch<S: ObjectStore + ?Sized>(&mut self, store: &S) -> Fetched {
        self.fetch_batch_at(store, Instant::now())
    }

    /// [`Self::fetch_batch`] with an explicit clock reading.
    pub fn fetch_batch_at<S: ObjectStore + ?Sized>(&mut self, store: &S, now: Instant) -> Fetched {
        if let Some(memo) = &self.memo
            && memo.key == self.key
            && now.saturating_duration_since(memo.fetched_at) < self.ttl
        {
            debug!(
                event = "core.refresh.cache_hit",
                generation = self.key.generation,
                records = memo.batch.len()
            );
            return Fetched {
                batch: Arc::clone(&memo.batch),
                error: None,
                cache_hit: true,
            };
        }

        match load_batch(store, &self.source) {
            Ok(batch) => {
                let batch = Arc::new(batch);
                self.memo = Some(MemoEntry {
                    key: self.key.clone(),
                    fetched_at: now,
                    batch: Arc::clone(&batch),
                });
                Fetched {
                    batch,
                    error: None,
                    cache_hit: false,
                }
            }
            Err(e) => {
                match e.severity() {
                    Severity::Warning => warn!(
                        event = "core.refresh.fetch_failed",
                        error = %e,
                        severity = "warning"
                    ),
                    Severity::Error => error!(
                        event = "core.refresh.fetch_failed",
                        error = %e,
                        severity = "error"
                    ),
                }
                // Failures are not memoized; the next cycle goes back to the store.
                self.memo = None;
                Fetched {
                    batch: Arc::new(Batch::empty()),
                    error: Some(e),
                    cache_hit: false,
                }
            }
        }
    }
}
