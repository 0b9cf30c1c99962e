use crate::config::SourceConfig;
use crate::records::{Batch, parse_document};
use crate::refresh::errors::FetchError;
use crate::store::ObjectStore;
use tracing::info;

/// The fixed namespace a session reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSource {
    pub prefix: String,
    pub suffix: String,
}

impl FetchSource {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }
}

impl From<&SourceConfig> for FetchSource {
    fn from(source: &SourceConfig) -> Self {
        Self::new(source.prefix(), source.suffix())
    }
}

/// List, read and parse every matching object into one batch.
///
/// Any read or parse failure aborts the whole load: there is no partial
/// batch and no per-object retry.
pub fn load_batch<S: ObjectStore + ?Sized>(
    store: &S,
    source: &FetchSource,
) -> Result<Batch, FetchError> {
    let location = store.describe();

    info!(
        event = "core.refresh.fetch_started",
        location = %location,
        prefix = %source.prefix
    );

    let listed = store
        .list(&source.prefix)
        .map_err(|e| FetchError::SourceUnavailable {
            location: location.clone(),
            prefix: source.prefix.clone(),
            source: e,
        })?;
    let listed_count = listed.len();

    let matching: Vec<_> = listed
        .into_iter()
        .filter(|object| object.key.ends_with(&source.suffix))
        .collect();

    if matching.is_empty() {
        return Err(FetchError::NoMatchingObjects {
            location,
            prefix: source.prefix.clone(),
            suffix: source.suffix.clone(),
        });
    }

    let mut batch = Batch::empty();
    for object in &matching {
        let bytes = store
            .get(&object.key)
            .map_err(|e| FetchError::ObjectReadFailed {
                key: object.key.clone(),
                source: e,
            })?;
        batch.extend(parse_document(&object.key, &bytes)?);
    }

    info!(
        event = "core.refresh.fetch_completed",
        listed = listed_count,
        objects = matching.len(),
        records = batch.len()
    );

    Ok(batch)
}
