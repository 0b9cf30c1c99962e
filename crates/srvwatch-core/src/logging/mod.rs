use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with optional quiet mode.
///
/// When `quiet` is true, only error-level events are emitted.
/// When `quiet` is false, info-level and above events are emitted.
/// Logs are JSON lines on stderr so stdout stays free for the dashboard.
pub fn init_logging(quiet: bool) {
    let directive = if quiet {
        "srvwatch=error,srvwatch_core=error"
    } else {
        "srvwatch=info,srvwatch_core=info"
    };

    let mut filter = EnvFilter::from_default_env();
    for part in directive.split(',') {
        if let Ok(parsed) = part.parse() {
            filter = filter.add_directive(parsed);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .init();
}
