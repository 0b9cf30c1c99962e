use crate::store::{ObjectMeta, ObjectStore, StoreError};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Directory tree read as an object store.
///
/// Keys are paths relative to the root, joined with `/`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.is_empty() || escapes {
            return Err(StoreError::InvalidKey {
                key: key.to_string(),
                message: "keys must be relative paths without '..'".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }

    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Option<Vec<&str>> = relative.components().map(|c| c.as_os_str().to_str()).collect();
        parts.map(|parts| parts.join("/"))
    }
}

impl ObjectStore for LocalStore {
    fn describe(&self) -> String {
        format!("file://{}", self.root.display())
    }

    fn list(&self, prefix: &str) -> Result<Vec<ObjectMeta>, StoreError> {
        if !self.root.is_dir() {
            return Err(StoreError::RootUnavailable {
                path: self.root.display().to_string(),
            });
        }

        let mut objects = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(key) = self.key_for(entry.path()) else {
                warn!(
                    event = "core.store.local_key_skipped",
                    path = %entry.path().display(),
                    "Skipping file whose path is not valid UTF-8"
                );
                continue;
            };

            if !key.starts_with(prefix) {
                continue;
            }

            let metadata = entry.metadata().map_err(std::io::Error::from)?;
            objects.push(ObjectMeta {
                key,
                size: metadata.len(),
                last_modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }

    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.resolve(key)?;
        fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound {
                key: key.to_string(),
            },
            _ => StoreError::IoError { source: e },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, key: &str, content: &str) {
        let path = root.join(key);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_list_filters_prefix_and_sorts() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "raw/b.json", "[]");
        write(temp_dir.path(), "raw/a.json", "[]");
        write(temp_dir.path(), "raw/nested/c.json", "[]");
        write(temp_dir.path(), "processed/d.json", "[]");

        let store = LocalStore::new(temp_dir.path());
        let keys: Vec<String> = store
            .list("raw/")
            .unwrap()
            .into_iter()
            .map(|o| o.key)
            .collect();

        assert_eq!(keys, vec!["raw/a.json", "raw/b.json", "raw/nested/c.json"]);
    }

    #[test]
    fn test_list_reports_size() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "raw/a.json", "12345");

        let objects = LocalStore::new(temp_dir.path()).list("").unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].size, 5);
        assert!(objects[0].last_modified.is_some());
    }

    #[test]
    fn test_list_empty_prefix_match() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "other/a.json", "[]");

        let objects = LocalStore::new(temp_dir.path()).list("raw/").unwrap();
        assert!(objects.is_empty());
    }

    #[test]
    fn test_list_missing_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(temp_dir.path().join("does-not-exist"));

        let err = store.list("raw/").unwrap_err();
        assert!(matches!(err, StoreError::RootUnavailable { .. }));
    }

    #[test]
    fn test_get_roundtrip_and_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(temp_dir.path(), "raw/a.json", "{\"x\": 1}");
        let store = LocalStore::new(temp_dir.path());

        assert_eq!(store.get("raw/a.json").unwrap(), b"{\"x\": 1}");
        assert!(matches!(
            store.get("raw/missing.json").unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }

    #[test]
    fn test_get_rejects_escaping_keys() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(temp_dir.path());

        assert!(matches!(
            store.get("../etc/passwd").unwrap_err(),
            StoreError::InvalidKey { .. }
        ));
        assert!(matches!(
            store.get("/etc/passwd").unwrap_err(),
            StoreError::InvalidKey { .. }
        ));
    }
}
