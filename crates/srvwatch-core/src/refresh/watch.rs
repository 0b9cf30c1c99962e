//! The poll loop: fetch, aggregate, render, wait, repeat.
//!
//! The wait is interruptible. Operator triggers arrive on an `mpsc` channel;
//! a `Refresh` forces a new refresh key and restarts the loop body at once,
//! a `Quit` ends the loop. When the trigger source goes away the loop keeps
//! polling on plain sleeps.

use crate::events::ShutdownReason;
use crate::refresh::handler::{DashboardView, run_cycle};
use crate::refresh::session::RefreshSession;
use crate::store::ObjectStore;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Presentation layer for one cycle's view.
pub trait Render {
    type Error;
    fn render(&mut self, view: &DashboardView) -> Result<(), Self::Error>;
}

/// Operator action delivered while the loop waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Refresh,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchOptions {
    pub interval: Duration,
    pub tail_rows: usize,
    /// Stop after this many rendered cycles.
    pub max_cycles: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSummary {
    pub cycles: u64,
    pub forced_refreshes: u64,
    pub reason: ShutdownReason,
}

enum Wake {
    Elapsed,
    Refresh,
    Quit,
}

/// Run the dashboard until a `Quit` trigger or the cycle limit.
///
/// Fetch failures never end the loop; only a render error does.
pub fn run_watch<S, R>(
    session: &mut RefreshSession,
    store: &S,
    renderer: &mut R,
    triggers: &Receiver<Trigger>,
    options: &WatchOptions,
) -> Result<WatchSummary, R::Error>
where
    S: ObjectStore + ?Sized,
    R: Render,
{
    info!(
        event = "core.watch.started",
        interval_secs = options.interval.as_secs(),
        ttl_secs = session.ttl().as_secs(),
        max_cycles = ?options.max_cycles
    );

    let mut cycles = 0;
    let mut forced_refreshes = 0;
    let mut triggers_open = true;

    let reason = loop {
        cycles += 1;
        let mut view = run_cycle(session, store, options.tail_rows, cycles);
        view.next_refresh_secs = Some(options.interval.as_secs());
        renderer.render(&view)?;

        if options.max_cycles.is_some_and(|max| cycles >= max) {
            break ShutdownReason::CycleLimit;
        }

        match wait_for_trigger(triggers, options.interval, &mut triggers_open) {
            Wake::Elapsed => {}
            Wake::Refresh => {
                session.force_refresh();
                forced_refreshes += 1;
            }
            Wake::Quit => break ShutdownReason::Requested,
        }
    };

    info!(
        event = "core.watch.completed",
        cycles = cycles,
        forced_refreshes = forced_refreshes
    );

    Ok(WatchSummary {
        cycles,
        forced_refreshes,
        reason,
    })
}

fn wait_for_trigger(triggers: &Receiver<Trigger>, interval: Duration, open: &mut bool) -> Wake {
    if !*open {
        std::thread::sleep(interval);
        return Wake::Elapsed;
    }

    let deadline = Instant::now() + interval;
    match triggers.recv_timeout(interval) {
        Ok(Trigger::Refresh) => Wake::Refresh,
        Ok(Trigger::Quit) => Wake::Quit,
        Err(RecvTimeoutError::Timeout) => Wake::Elapsed,
        Err(RecvTimeoutError::Disconnected) => {
            debug!(event = "core.watch.triggers_closed");
            *open = false;
            std::thread::sleep(deadline.saturating_duration_since(Instant::now()));
            Wake::Elapsed
        }
    }
}
