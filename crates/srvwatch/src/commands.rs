use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::ArgMatches;
use tracing::{error, info, warn};

use srvwatch_core::SrvwatchError;
use srvwatch_core::config::{RefreshConfig, SourceConfig, WatchConfig};
use srvwatch_core::events::{self, ShutdownReason};
use srvwatch_core::open_store;
use srvwatch_core::refresh::{FetchSource, RefreshSession, Render, WatchOptions, run_watch};
use srvwatch_core::refresh_ops;

use crate::input;
use crate::render::{JsonRenderer, TerminalRenderer};

/// Load configuration with warning on errors.
///
/// Falls back to defaults if config loading fails, but notifies the user via:
/// - stderr message for immediate visibility
/// - structured log event `cli.config.load_failed` for debugging
fn load_config_with_warning() -> WatchConfig {
    match WatchConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.srvwatch/config.toml and ./.srvwatch/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            WatchConfig::default()
        }
    }
}

/// Log a command failure: user mistakes as warnings, everything else as errors.
fn log_failure<E: SrvwatchError>(event: &'static str, e: &E) {
    if e.is_user_error() {
        warn!(event = event, error = %e, error_code = e.error_code());
    } else {
        error!(event = event, error = %e, error_code = e.error_code());
        events::log_app_error(e);
    }
}

/// Read an optional flag that not every subcommand defines.
fn optional<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str) -> Option<T> {
    matches.try_get_one::<T>(id).ok().flatten().cloned()
}

/// Config layer built from CLI flags. `--bucket` implies the s3 backend and
/// `--root` the local one unless `--backend` says otherwise.
fn config_overrides(matches: &ArgMatches) -> WatchConfig {
    let root = optional::<String>(matches, "root").map(PathBuf::from);
    let bucket = optional::<String>(matches, "bucket");
    let backend = optional::<String>(matches, "backend").or_else(|| {
        if bucket.is_some() {
            Some("s3".to_string())
        } else if root.is_some() {
            Some("local".to_string())
        } else {
            None
        }
    });

    WatchConfig {
        source: SourceConfig {
            backend,
            root,
            bucket,
            region: optional(matches, "region"),
            prefix: optional(matches, "prefix"),
            suffix: optional(matches, "suffix"),
        },
        refresh: RefreshConfig {
            interval_secs: optional(matches, "interval"),
            cache_ttl_secs: optional(matches, "ttl"),
            tail_rows: optional(matches, "tail"),
        },
    }
}

fn resolve_config(matches: &ArgMatches) -> Result<WatchConfig, Box<dyn std::error::Error>> {
    match load_config_with_warning().with_overrides(config_overrides(matches)) {
        Ok(config) => Ok(config),
        Err(e) => {
            eprintln!("❌ Invalid configuration: {}", e);
            log_failure("cli.config.invalid", &e);
            Err(e.into())
        }
    }
}

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    events::log_app_startup(matches.subcommand_name().unwrap_or("none"));

    match matches.subcommand() {
        Some(("watch", sub_matches)) => handle_watch_command(sub_matches),
        Some(("snapshot", sub_matches)) => handle_snapshot_command(sub_matches),
        Some(("config", sub_matches)) => handle_config_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}

fn handle_watch_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(matches)?;
    let json = matches.get_flag("json");
    let options = WatchOptions {
        interval: config.refresh.interval(),
        tail_rows: config.refresh.tail_rows(),
        max_cycles: matches.get_one::<u64>("cycles").copied(),
    };

    info!(
        event = "cli.watch_started",
        prefix = config.source.prefix(),
        suffix = config.source.suffix(),
        interval_secs = options.interval.as_secs(),
        json = json
    );

    let store = match open_store(&config.source) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("❌ Failed to open source: {}", e);
            log_failure("cli.watch_failed", &e);
            return Err(e.into());
        }
    };

    let mut session = RefreshSession::new(
        FetchSource::from(&config.source),
        config.refresh.cache_ttl(),
    );
    let triggers = input::spawn_trigger_reader();

    let stdout = io::stdout();
    let clear_screen = stdout.is_terminal();
    let summary = if json {
        let mut renderer = JsonRenderer::new(stdout.lock());
        run_watch(&mut session, &*store, &mut renderer, &triggers, &options)?
    } else {
        let mut renderer = TerminalRenderer::new(stdout.lock(), clear_screen);
        run_watch(&mut session, &*store, &mut renderer, &triggers, &options)?
    };

    info!(
        event = "cli.watch_completed",
        cycles = summary.cycles,
        forced_refreshes = summary.forced_refreshes
    );
    events::log_app_shutdown(summary.reason, summary.cycles);

    Ok(())
}

fn handle_snapshot_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(matches)?;

    info!(
        event = "cli.snapshot_started",
        prefix = config.source.prefix(),
        suffix = config.source.suffix()
    );

    let store = match open_store(&config.source) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("❌ Failed to open source: {}", e);
            log_failure("cli.snapshot_failed", &e);
            return Err(e.into());
        }
    };

    let mut session = RefreshSession::new(
        FetchSource::from(&config.source),
        config.refresh.cache_ttl(),
    );
    // A failed fetch is part of the view, not an exit status.
    let view = refresh_ops::run_cycle(&mut session, &*store, config.refresh.tail_rows(), 1);

    let stdout = io::stdout();
    if matches.get_flag("json") {
        JsonRenderer::new(stdout.lock()).render(&view)?;
    } else {
        TerminalRenderer::new(stdout.lock(), false).render(&view)?;
    }

    info!(
        event = "cli.snapshot_completed",
        records = view.batch_size,
        servers = view.tally.len(),
        notice = view.notice.as_ref().map(|n| n.code)
    );
    events::log_app_shutdown(ShutdownReason::Completed, 1);

    Ok(())
}

fn handle_config_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(matches)?;
    print!("{}", config.effective().to_toml()?);

    info!(event = "cli.config_completed");

    Ok(())
}
