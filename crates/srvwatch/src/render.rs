use std::io::{self, Write};

use srvwatch_core::refresh::{DashboardView, Notice, Render, Severity};
use srvwatch_core::tally::StatusCounts;

use crate::table::TableFormatter;

const BAR_WIDTH: u64 = 30;
const MAX_CELL_WIDTH: usize = 40;
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Human-readable dashboard.
pub struct TerminalRenderer<W: Write> {
    out: W,
    clear_screen: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, clear_screen: bool) -> Self {
        Self { out, clear_screen }
    }
}

impl<W: Write> Render for TerminalRenderer<W> {
    type Error = io::Error;

    fn render(&mut self, view: &DashboardView) -> io::Result<()> {
        if self.clear_screen {
            write!(self.out, "{CLEAR_SCREEN}")?;
        }
        for line in format_dashboard(view) {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}

/// One JSON document per cycle, newline-delimited.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Render for JsonRenderer<W> {
    type Error = io::Error;

    fn render(&mut self, view: &DashboardView) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, view)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

pub fn format_dashboard(view: &DashboardView) -> Vec<String> {
    let mut lines = Vec::new();

    let cache = if view.cache_hit { " (cached)" } else { "" };
    lines.push(format!("srvwatch: {}", view.location));
    lines.push(format!(
        "Last refresh: {}   Rendered: {}{}",
        view.last_refresh.format("%Y-%m-%d %H:%M:%S UTC"),
        view.rendered_at.format("%H:%M:%S"),
        cache
    ));
    lines.push(String::new());
    lines.push(format!(
        "  OK: {}    WARN: {}    ERROR: {}    ({} records)",
        view.totals.ok, view.totals.warn, view.totals.error, view.batch_size
    ));
    if view.tally.unknown_statuses() > 0 {
        lines.push(format!(
            "  ({} records with an unrecognized status were not counted)",
            view.tally.unknown_statuses()
        ));
    }
    lines.push(String::new());

    if let Some(notice) = &view.notice {
        lines.push(format_notice(notice));
        lines.push(String::new());
    }

    if !view.tally.is_empty() {
        let rows: Vec<Vec<String>> = view
            .tally
            .rows()
            .map(|row| {
                let mut cells = vec![row.server_id.to_string()];
                cells.extend(row.counts.columns().iter().map(|(_, n)| n.to_string()));
                cells
            })
            .collect();
        let table = TableFormatter::new(&["Server", "OK", "WARN", "ERROR"], &rows, MAX_CELL_WIDTH);
        lines.extend(table.render(&rows));
        lines.push(String::new());

        lines.push("Status by server".to_string());
        let max = view.tally.max_count();
        let label_width = rows
            .iter()
            .map(|row| row[0].chars().count())
            .max()
            .unwrap_or(0)
            .min(MAX_CELL_WIDTH);
        for row in view.tally.rows() {
            lines.extend(format_bars(&row.server_id.to_string(), &row.counts, max, label_width));
        }
        lines.push(String::new());
    }

    if !view.tail.is_empty() {
        lines.push(format!("Recent records (last {})", view.tail.len()));
        let rows: Vec<Vec<String>> = view
            .tail
            .iter()
            .map(|record| {
                vec![
                    record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    record.server_id.to_string(),
                    record.status.to_string(),
                    record.source_key.clone(),
                ]
            })
            .collect();
        let table = TableFormatter::new(
            &["Timestamp", "Server", "Status", "Source"],
            &rows,
            MAX_CELL_WIDTH,
        );
        lines.extend(table.render(&rows));
        lines.push(String::new());
    }

    if let Some(secs) = view.next_refresh_secs {
        lines.push(format!(
            "Refreshing every {secs}s. Press Enter to refresh, q then Enter to quit."
        ));
    }

    lines
}

fn format_notice(notice: &Notice) -> String {
    match notice.severity {
        Severity::Warning => format!("⚠️  Warning: {}", notice.message),
        Severity::Error => format!("❌ Error: {}", notice.message),
    }
}

fn format_bars(label: &str, counts: &StatusCounts, max: u64, label_width: usize) -> Vec<String> {
    counts
        .columns()
        .iter()
        .enumerate()
        .map(|(i, (status, count))| {
            let label = if i == 0 { label } else { "" };
            format!(
                "  {} {:<5} {} {}",
                crate::table::truncate(label, label_width),
                status.as_str(),
                "█".repeat(bar_length(*count, max) as usize),
                count
            )
        })
        .collect()
}

/// Bar length scaled to `max`; any nonzero count gets at least one cell.
fn bar_length(count: u64, max: u64) -> u64 {
    if max == 0 {
        0
    } else {
        (count * BAR_WIDTH).div_ceil(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use srvwatch_core::refresh::{FetchSource, RefreshSession, run_cycle};
    use srvwatch_core::store::MemoryStore;
    use std::time::Duration;

    fn scenario_view() -> DashboardView {
        let store = MemoryStore::new().with_object(
            "raw/a.json",
            r#"[
                {"server_id": "s1", "status": "OK", "timestamp": "2024-05-01T12:00:00Z"},
                {"server_id": "s1", "status": "ERROR", "timestamp": "2024-05-01T12:01:00Z"},
                {"server_id": "s2", "status": "OK", "timestamp": "2024-05-01T12:02:00Z"}
            ]"#,
        );
        let mut session =
            RefreshSession::new(FetchSource::new("raw/", ".json"), Duration::from_secs(60));
        run_cycle(&mut session, &store, 10, 1)
    }

    #[test]
    fn test_bar_length_scales_to_max() {
        assert_eq!(bar_length(0, 0), 0);
        assert_eq!(bar_length(0, 10), 0);
        assert_eq!(bar_length(10, 10), BAR_WIDTH);
        assert_eq!(bar_length(5, 10), BAR_WIDTH / 2);
        assert_eq!(bar_length(1, 1000), 1);
    }

    #[test]
    fn test_dashboard_shows_totals_table_and_tail() {
        let view = scenario_view();
        let text = format_dashboard(&view).join("\n");

        assert!(text.contains("OK: 2    WARN: 0    ERROR: 1"));
        assert!(text.contains("│ Server │ OK │ WARN │ ERROR │"));
        assert!(text.contains("│ s1     │ 1  │ 0    │ 1     │"));
        assert!(text.contains("Recent records (last 3)"));
        assert!(text.contains("raw/a.json"));
        assert!(!text.contains("Press Enter"));
    }

    #[test]
    fn test_dashboard_shows_notice_without_tables() {
        let store = MemoryStore::new();
        let mut session =
            RefreshSession::new(FetchSource::new("raw/", ".json"), Duration::from_secs(60));
        let mut view = run_cycle(&mut session, &store, 10, 1);
        view.next_refresh_secs = Some(10);
        let text = format_dashboard(&view).join("\n");

        assert!(text.contains("Warning:"));
        assert!(text.contains("OK: 0    WARN: 0    ERROR: 0"));
        assert!(!text.contains("│ Server"));
        assert!(text.contains("Refreshing every 10s. Press Enter to refresh, q then Enter to quit."));
    }

    #[test]
    fn test_json_renderer_writes_one_line_per_view() {
        let view = scenario_view();
        let mut out = Vec::new();
        {
            let mut renderer = JsonRenderer::new(&mut out);
            renderer.render(&view).unwrap();
            renderer.render(&view).unwrap();
        }

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["totals"]["OK"], 2);
        assert_eq!(parsed["tally"][0]["server_id"], "s1");
    }

    #[test]
    fn test_terminal_renderer_clears_only_when_asked() {
        let view = scenario_view();

        let mut plain = Vec::new();
        TerminalRenderer::new(&mut plain, false).render(&view).unwrap();
        assert!(!String::from_utf8(plain).unwrap().contains(CLEAR_SCREEN));

        let mut cleared = Vec::new();
        TerminalRenderer::new(&mut cleared, true).render(&view).unwrap();
        assert!(String::from_utf8(cleared).unwrap().starts_with(CLEAR_SCREEN));
    }
}
