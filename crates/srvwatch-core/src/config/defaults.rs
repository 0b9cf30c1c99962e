//! Default values and accessors for configuration types.

use crate::config::types::{RefreshConfig, SourceBackend, SourceConfig};
use crate::errors::ConfigError;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PREFIX: &str = "raw/";
pub const DEFAULT_SUFFIX: &str = ".json";
pub const DEFAULT_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;
pub const DEFAULT_TAIL_ROWS: usize = 10;

impl SourceConfig {
    /// Parsed backend, `local` when unset.
    pub fn backend_kind(&self) -> Result<SourceBackend, ConfigError> {
        match self.backend.as_deref() {
            None | Some("local") => Ok(SourceBackend::Local),
            Some("s3") => Ok(SourceBackend::S3),
            Some(other) => Err(ConfigError::InvalidBackend {
                backend: other.to_string(),
            }),
        }
    }

    pub fn root(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(|| Path::new(".").to_path_buf())
    }

    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or(DEFAULT_PREFIX)
    }

    pub fn suffix(&self) -> &str {
        self.suffix.as_deref().unwrap_or(DEFAULT_SUFFIX)
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.unwrap_or(DEFAULT_INTERVAL_SECS))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs.unwrap_or(DEFAULT_CACHE_TTL_SECS))
    }

    pub fn tail_rows(&self) -> usize {
        self.tail_rows.unwrap_or(DEFAULT_TAIL_ROWS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_defaults() {
        let source = SourceConfig::default();
        assert_eq!(source.backend_kind().unwrap(), SourceBackend::Local);
        assert_eq!(source.root(), PathBuf::from("."));
        assert_eq!(source.prefix(), "raw/");
        assert_eq!(source.suffix(), ".json");
    }

    #[test]
    fn test_refresh_defaults() {
        let refresh = RefreshConfig::default();
        assert_eq!(refresh.interval(), Duration::from_secs(10));
        assert_eq!(refresh.cache_ttl(), Duration::from_secs(60));
        assert_eq!(refresh.tail_rows(), 10);
    }

    #[test]
    fn test_backend_kind_rejects_unknown() {
        let source = SourceConfig {
            backend: Some("gcs".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            source.backend_kind(),
            Err(ConfigError::InvalidBackend { .. })
        ));
    }
}
