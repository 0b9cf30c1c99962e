//! # Configuration System
//!
//! Hierarchical TOML configuration for srvwatch.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.srvwatch/config.toml`
//! 3. **Project config** - `./.srvwatch/config.toml`
//! 4. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use srvwatch_core::config::WatchConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = WatchConfig::load_hierarchy()?;
//!     println!("polling every {:?}", config.refresh.interval());
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use defaults::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_INTERVAL_SECS, DEFAULT_PREFIX, DEFAULT_SUFFIX,
    DEFAULT_TAIL_ROWS,
};
pub use types::{RefreshConfig, SourceBackend, SourceConfig, WatchConfig};
pub use validation::{VALID_BACKENDS, validate_config};

impl WatchConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Layer `overrides` (typically built from CLI flags) on top and
    /// re-validate.
    pub fn with_overrides(self, overrides: WatchConfig) -> Result<Self, crate::errors::ConfigError> {
        let merged = loading::merge_configs(self, overrides);
        validate_config(&merged)?;
        Ok(merged)
    }

    /// Copy with every default filled in, for display.
    pub fn effective(&self) -> WatchConfig {
        let backend = self
            .source
            .backend_kind()
            .map(SourceBackend::as_str)
            .unwrap_or("local");
        WatchConfig {
            source: SourceConfig {
                backend: Some(backend.to_string()),
                root: match backend {
                    "local" => Some(self.source.root()),
                    _ => self.source.root.clone(),
                },
                bucket: self.source.bucket.clone(),
                region: self.source.region.clone(),
                prefix: Some(self.source.prefix().to_string()),
                suffix: Some(self.source.suffix().to_string()),
            },
            refresh: RefreshConfig {
                interval_secs: Some(self.refresh.interval().as_secs()),
                cache_ttl_secs: Some(self.refresh.cache_ttl().as_secs()),
                tail_rows: Some(self.refresh.tail_rows()),
            },
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_fills_defaults() {
        let effective = WatchConfig::default().effective();

        assert_eq!(effective.source.backend.as_deref(), Some("local"));
        assert_eq!(effective.source.prefix.as_deref(), Some(DEFAULT_PREFIX));
        assert_eq!(effective.source.suffix.as_deref(), Some(DEFAULT_SUFFIX));
        assert_eq!(effective.refresh.interval_secs, Some(DEFAULT_INTERVAL_SECS));
        assert_eq!(effective.refresh.cache_ttl_secs, Some(DEFAULT_CACHE_TTL_SECS));
        assert_eq!(effective.refresh.tail_rows, Some(DEFAULT_TAIL_ROWS));
        assert!(effective.source.bucket.is_none());
    }

    #[test]
    fn test_with_overrides_validates_result() {
        let overrides = WatchConfig {
            source: SourceConfig {
                backend: Some("s3".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(WatchConfig::default().with_overrides(overrides).is_err());
    }

    #[test]
    fn test_effective_config_renders_toml() {
        let config = WatchConfig {
            source: SourceConfig {
                backend: Some("s3".to_string()),
                bucket: Some("ops-status".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let toml = config.effective().to_toml().unwrap();

        assert!(toml.contains("[source]"));
        assert!(toml.contains("bucket = \"ops-status\""));
        assert!(toml.contains("interval_secs = 10"));
        assert!(!toml.contains("root"));
    }
}
