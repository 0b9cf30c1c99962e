//! Application lifecycle events shared by every srvwatch entry point.

use tracing::{error, info};

pub fn log_app_startup(command: &str) {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION"),
        command = command
    );
}

/// Why the dashboard stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// Operator asked to quit.
    Requested,
    /// The configured cycle limit was reached.
    CycleLimit,
    /// A single snapshot was rendered.
    Completed,
}

impl ShutdownReason {
    fn as_str(self) -> &'static str {
        match self {
            ShutdownReason::Requested => "requested",
            ShutdownReason::CycleLimit => "cycle_limit",
            ShutdownReason::Completed => "completed",
        }
    }
}

pub fn log_app_shutdown(reason: ShutdownReason, cycles: u64) {
    info!(
        event = "core.app.shutdown_started",
        reason = reason.as_str(),
        cycles = cycles
    );
}

pub fn log_app_error(error: &dyn std::error::Error) {
    error!(
        event = "core.app.error_occurred",
        error = %error,
        error_type = std::any::type_name_of_val(error)
    );
}
