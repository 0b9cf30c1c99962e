//! srvwatch-core: poll object storage and tally server status records
//!
//! This library provides everything behind the `srvwatch` dashboard except
//! the terminal output itself.
//!
//! # Main Entry Points
//!
//! - [`records`] - Status documents, parsed into typed records
//! - [`tally`] - Per-server OK/WARN/ERROR counts
//! - [`store`] - Object storage backends (local directory, memory, S3)
//! - [`refresh`] - Memoized fetch, forced refresh, and the poll loop
//! - [`config`] - Configuration management

pub mod config;
pub mod errors;
pub mod events;
pub mod logging;
pub mod records;
pub mod refresh;
pub mod store;
pub mod tally;

// Re-export commonly used types at crate root for convenience
pub use config::WatchConfig;
pub use errors::{ConfigError, SrvwatchError};
pub use records::{Batch, Record, ServerId, Status};
pub use refresh::{DashboardView, RefreshSession, Render, Trigger, WatchOptions};
pub use store::{ObjectStore, open_store};
pub use tally::{StatusCounts, StatusTally, StatusTotals};

// Re-export handler modules as the primary API
pub use refresh::handler as refresh_ops;

// Re-export logging initialization
pub use logging::init_logging;
