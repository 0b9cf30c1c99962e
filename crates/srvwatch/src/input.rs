use std::io::{self, BufRead};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use srvwatch_core::refresh::Trigger;
use tracing::{debug, warn};

/// Read operator keystrokes from stdin on a background thread.
///
/// The returned receiver disconnects when stdin reaches EOF, after which the
/// watch loop keeps polling on its interval.
pub fn spawn_trigger_reader() -> Receiver<Trigger> {
    let (sender, receiver) = mpsc::channel();

    let spawned = thread::Builder::new()
        .name("srvwatch-input".to_string())
        .spawn(move || read_triggers(io::stdin().lock(), &sender));

    if let Err(e) = spawned {
        warn!(
            event = "cli.input.spawn_failed",
            error = %e,
            "Manual refresh unavailable"
        );
    }

    receiver
}

/// Enter or `r` refreshes, `q` quits; anything else is ignored.
pub fn parse_trigger(line: &str) -> Option<Trigger> {
    match line.trim() {
        "" | "r" | "R" => Some(Trigger::Refresh),
        "q" | "Q" => Some(Trigger::Quit),
        _ => None,
    }
}

fn read_triggers<R: BufRead>(reader: R, sender: &Sender<Trigger>) {
    for line in reader.lines() {
        let Ok(line) = line else {
            break;
        };
        let Some(trigger) = parse_trigger(&line) else {
            continue;
        };
        debug!(event = "cli.input.trigger_received", trigger = ?trigger);
        if sender.send(trigger).is_err() || trigger == Trigger::Quit {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_trigger() {
        assert_eq!(parse_trigger(""), Some(Trigger::Refresh));
        assert_eq!(parse_trigger("r"), Some(Trigger::Refresh));
        assert_eq!(parse_trigger("  R \r"), Some(Trigger::Refresh));
        assert_eq!(parse_trigger("q"), Some(Trigger::Quit));
        assert_eq!(parse_trigger("refresh"), None);
    }

    #[test]
    fn test_read_triggers_stops_at_quit() {
        let (sender, receiver) = mpsc::channel();
        read_triggers(Cursor::new("\nx\nr\nq\nr\n"), &sender);
        drop(sender);

        let received: Vec<Trigger> = receiver.iter().collect();
        assert_eq!(
            received,
            vec![Trigger::Refresh, Trigger::Refresh, Trigger::Quit]
        );
    }

    #[test]
    fn test_read_triggers_ends_at_eof() {
        let (sender, receiver) = mpsc::channel();
        read_triggers(Cursor::new("r\n"), &sender);
        drop(sender);

        assert_eq!(receiver.iter().count(), 1);
    }
}
