//! Configuration type definitions for srvwatch.
//!
//! # Example Configuration
//!
//! ```toml
//! [source]
//! backend = "s3"
//! bucket = "ops-status"
//! region = "eu-west-1"
//! prefix = "raw/"
//! suffix = ".json"
//!
//! [refresh]
//! interval_secs = 10
//! cache_ttl_secs = 60
//! tail_rows = 10
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration loaded from TOML config files.
///
/// Loaded from `~/.srvwatch/config.toml`, then `./.srvwatch/config.toml`.
/// Every field is optional so files and CLI flags can be layered; the
/// accessor methods supply defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WatchConfig {
    /// Where status documents are read from
    #[serde(default)]
    pub source: SourceConfig,

    /// Poll loop timing
    #[serde(default)]
    pub refresh: RefreshConfig,
}

/// Record source configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SourceConfig {
    /// Storage backend: `local` or `s3`. Default: `local`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,

    /// Root directory for the `local` backend. Default: current directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Bucket name for the `s3` backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,

    /// AWS region override for the `s3` backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Namespace prefix every status document lives under. Default: `raw/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Key suffix of status documents. Default: `.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

/// Poll loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RefreshConfig {
    /// Seconds to wait between refresh cycles. Default: 10.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_secs: Option<u64>,

    /// Seconds a fetched batch may be reused. Default: 60.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_ttl_secs: Option<u64>,

    /// Raw records shown in the tail sample. Default: 10.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tail_rows: Option<usize>,
}

/// Supported storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceBackend {
    Local,
    S3,
}

impl SourceBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceBackend::Local => "local",
            SourceBackend::S3 => "s3",
        }
    }
}
