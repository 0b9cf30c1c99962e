//! Read-only object storage used as the record source.
//!
//! Backends list keys under a prefix and fetch whole objects. Listing order
//! is lexicographic by key, which is what S3 `ListObjectsV2` returns, so a
//! batch is assembled in the same order whatever the backend.

pub mod errors;
pub mod local;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

use crate::config::{SourceBackend, SourceConfig};
use chrono::{DateTime, Utc};

pub use errors::StoreError;
pub use local::LocalStore;
pub use memory::MemoryStore;
#[cfg(feature = "s3")]
pub use s3::S3Store;

/// Metadata of one listed object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Object storage the dashboard reads from.
pub trait ObjectStore {
    /// Human-readable location, used in logs and notices.
    fn describe(&self) -> String;

    /// Every object whose key starts with `prefix`, sorted by key.
    ///
    /// Returns an empty vec when nothing matches.
    fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>, StoreError>;

    /// Whole object content.
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;
}

impl<S: ObjectStore + ?Sized> ObjectStore for Box<S> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>, StoreError> {
        (**self).list(prefix)
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).get(key)
    }
}

/// Open the store described by `source`.
///
/// Expects a validated config.
pub fn open_store(source: &SourceConfig) -> Result<Box<dyn ObjectStore>, StoreError> {
    let backend = source.backend_kind().map_err(|e| StoreError::Backend {
        message: e.to_string(),
    })?;

    match backend {
        SourceBackend::Local => Ok(Box::new(LocalStore::new(source.root()))),
        SourceBackend::S3 => open_s3(source),
    }
}

#[cfg(feature = "s3")]
fn open_s3(source: &SourceConfig) -> Result<Box<dyn ObjectStore>, StoreError> {
    let bucket = source.bucket.as_deref().ok_or_else(|| StoreError::Backend {
        message: "no bucket configured".to_string(),
    })?;
    Ok(Box::new(S3Store::connect(bucket, source.region.as_deref())?))
}

#[cfg(not(feature = "s3"))]
fn open_s3(_source: &SourceConfig) -> Result<Box<dyn ObjectStore>, StoreError> {
    Err(StoreError::Unsupported {
        backend: SourceBackend::S3.as_str().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_local_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = SourceConfig {
            root: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };

        let store = open_store(&source).unwrap();
        assert_eq!(store.describe(), format!("file://{}", temp_dir.path().display()));
        assert!(store.list("raw/").unwrap().is_empty());
    }

    #[cfg(not(feature = "s3"))]
    #[test]
    fn test_open_s3_without_feature() {
        let source = SourceConfig {
            backend: Some("s3".to_string()),
            bucket: Some("ops-status".to_string()),
            ..Default::default()
        };

        let err = open_store(&source).err().unwrap();
        assert!(matches!(err, StoreError::Unsupported { .. }));
    }
}
