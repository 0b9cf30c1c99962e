use crate::records::Batch;
use crate::tally::types::{StatusCounts, StatusTally};
use std::collections::BTreeMap;
use tracing::debug;

/// Count statuses per server.
///
/// Every server seen in the batch gets a row, including servers whose
/// records all carry unknown statuses (their counts stay 0). Total over every
/// batch, including the empty one.
pub fn aggregate(batch: &Batch) -> StatusTally {
    let mut rows: BTreeMap<_, StatusCounts> = BTreeMap::new();
    let mut unknown = 0;

    for record in batch {
        let counts = rows.entry(record.server_id.clone()).or_default();
        if !counts.record(&record.status) {
            unknown += 1;
        }
    }

    debug!(
        event = "core.tally.aggregate_completed",
        records = batch.len(),
        servers = rows.len(),
        unknown_statuses = unknown
    );

    StatusTally::from_parts(rows, unknown)
}
