//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.srvwatch/config.toml`
//! 3. **Project config** - `./.srvwatch/config.toml`
//! 4. **CLI arguments** - Command-line flags (highest priority)

use crate::config::types::{RefreshConfig, SourceConfig, WatchConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR: &str = ".srvwatch";
pub const CONFIG_FILE: &str = "config.toml";

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error if a file exists but cannot be read or parsed, or if
/// validation fails. Missing config files are not errors.
pub fn load_hierarchy() -> Result<WatchConfig, ConfigError> {
    let user_path = dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE));
    let project_path = std::env::current_dir()
        .map_err(|source| ConfigError::ReadFailed {
            path: ".".to_string(),
            source,
        })?
        .join(CONFIG_DIR)
        .join(CONFIG_FILE);

    load_hierarchy_from(user_path.as_deref(), &project_path)
}

/// Load and merge the given user and project config files.
pub fn load_hierarchy_from(
    user_path: Option<&Path>,
    project_path: &Path,
) -> Result<WatchConfig, ConfigError> {
    let mut config = WatchConfig::default();

    if let Some(user_path) = user_path {
        match load_config_file(user_path) {
            Ok(user_config) => config = merge_configs(config, user_config),
            Err(e) if !e.is_file_not_found() => return Err(e),
            Err(_) => {} // File not found - continue with defaults
        }
    }

    match load_config_file(project_path) {
        Ok(project_config) => config = merge_configs(config, project_config),
        Err(e) if !e.is_file_not_found() => return Err(e),
        Err(_) => {}
    }

    validate_config(&config)?;

    Ok(config)
}

/// Load a configuration file from the given path.
pub fn load_config_file(path: &Path) -> Result<WatchConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&content).map_err(|message| ConfigError::ConfigParseError {
        path: path.display().to_string(),
        message,
    })
}

pub fn parse_config(content: &str) -> Result<WatchConfig, String> {
    toml::from_str(content).map_err(|e| e.to_string())
}

/// Merge two configurations, with `override_config` taking precedence for
/// every field it sets.
pub fn merge_configs(base: WatchConfig, override_config: WatchConfig) -> WatchConfig {
    WatchConfig {
        source: SourceConfig {
            backend: override_config.source.backend.or(base.source.backend),
            root: override_config.source.root.or(base.source.root),
            bucket: override_config.source.bucket.or(base.source.bucket),
            region: override_config.source.region.or(base.source.region),
            prefix: override_config.source.prefix.or(base.source.prefix),
            suffix: override_config.source.suffix.or(base.source.suffix),
        },
        refresh: RefreshConfig {
            interval_secs: override_config
                .refresh
                .interval_secs
                .or(base.refresh.interval_secs),
            cache_ttl_secs: override_config
                .refresh
                .cache_ttl_secs
                .or(base.refresh.cache_ttl_secs),
            tail_rows: override_config.refresh.tail_rows.or(base.refresh.tail_rows),
        },
    }
}

/// Project config path relative to `dir`.
pub fn project_config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_DIR).join(CONFIG_FILE)
}
