use crate::store::{ObjectMeta, ObjectStore, StoreError};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory object store.
///
/// Counts round trips so callers can observe caching. Not meant for
/// production use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
    list_failure: RwLock<Option<String>>,
    get_failure: RwLock<Option<String>>,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_object(self, key: &str, data: impl Into<Vec<u8>>) -> Self {
        self.put(key, data);
        self
    }

    pub fn put(&self, key: &str, data: impl Into<Vec<u8>>) {
        if let Ok(mut objects) = self.objects.write() {
            objects.insert(key.to_string(), data.into());
        }
    }

    /// Make `get` of `key` fail while it stays listed; `None` heals it.
    pub fn set_get_failure(&self, key: Option<&str>) {
        if let Ok(mut failure) = self.get_failure.write() {
            *failure = key.map(str::to_string);
        }
    }

    /// Make every following `list` call fail with `message`; `None` heals it.
    pub fn set_list_failure(&self, message: Option<&str>) {
        if let Ok(mut failure) = self.list_failure.write() {
            *failure = message.map(str::to_string);
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend {
        message: "lock poisoned".to_string(),
    }
}

impl ObjectStore for MemoryStore {
    fn describe(&self) -> String {
        "memory://".to_string()
    }

    fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.list_failure.read().map_err(|_| poisoned())?.clone() {
            return Err(StoreError::Backend { message });
        }

        let objects = self.objects.read().map_err(|_| poisoned())?;
        Ok(objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, data)| ObjectMeta {
                key: key.clone(),
                size: data.len() as u64,
                last_modified: Some(Utc::now()),
            })
            .collect())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);

        if self.get_failure.read().map_err(|_| poisoned())?.as_deref() == Some(key) {
            return Err(StoreError::Backend {
                message: format!("read of '{}' failed", key),
            });
        }

        let objects = self.objects.read().map_err(|_| poisoned())?;
        objects.get(key).cloned().ok_or_else(|| StoreError::NotFound {
            key: key.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_and_get_count_calls() {
        let store = MemoryStore::new()
            .with_object("raw/b.json", "[]")
            .with_object("raw/a.json", "{}")
            .with_object("other/c.json", "[]");

        let keys: Vec<String> = store.list("raw/").unwrap().into_iter().map(|o| o.key).collect();
        assert_eq!(keys, vec!["raw/a.json", "raw/b.json"]);
        assert_eq!(store.get("raw/a.json").unwrap(), b"{}");
        assert!(store.get("raw/zzz.json").is_err());

        assert_eq!(store.list_calls(), 1);
        assert_eq!(store.get_calls(), 2);
    }

    #[test]
    fn test_list_failure_injection() {
        let store = MemoryStore::new().with_object("raw/a.json", "{}");

        store.set_list_failure(Some("network down"));
        let err = store.list("raw/").unwrap_err();
        assert_eq!(err.to_string(), "Storage backend error: network down");

        store.set_list_failure(None);
        assert_eq!(store.list("raw/").unwrap().len(), 1);
    }

    #[test]
    fn test_get_failure_injection() {
        let store = MemoryStore::new()
            .with_object("raw/a.json", "{}")
            .with_object("raw/b.json", "{}");

        store.set_get_failure(Some("raw/b.json"));
        assert_eq!(store.list("raw/").unwrap().len(), 2);
        assert!(store.get("raw/a.json").is_ok());
        assert_eq!(
            store.get("raw/b.json").unwrap_err().to_string(),
            "Storage backend error: read of 'raw/b.json' failed"
        );

        store.set_get_failure(None);
        assert!(store.get("raw/b.json").is_ok());
    }
}
