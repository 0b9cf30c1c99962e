pub mod errors;
pub mod fetch;
pub mod handler;
pub mod session;
pub mod watch;

// Re-export commonly used types
pub use errors::{FetchError, Severity};
pub use fetch::{FetchSource, load_batch};
pub use handler::{DashboardView, Notice, run_cycle};
pub use session::{Fetched, RefreshKey, RefreshSession};
pub use watch::{Render, Trigger, WatchOptions, WatchSummary, run_watch};
