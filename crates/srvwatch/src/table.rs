/// Box-drawn table with columns sized to their widest cell.
pub struct TableFormatter {
    headers: Vec<&'static str>,
    widths: Vec<usize>,
}

impl TableFormatter {
    pub fn new(headers: &[&'static str], rows: &[Vec<String>], max_width: usize) -> Self {
        let widths = headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                rows.iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
                    .clamp(header.chars().count(), max_width.max(header.chars().count()))
            })
            .collect();

        Self {
            headers: headers.to_vec(),
            widths,
        }
    }

    /// Render header, rows and borders as lines ready to print.
    pub fn render(&self, rows: &[Vec<String>]) -> Vec<String> {
        let mut lines = Vec::with_capacity(rows.len() + 4);
        lines.push(self.border('┌', '┬', '┐'));
        lines.push(self.row_line(&self.headers));
        lines.push(self.border('├', '┼', '┤'));
        for row in rows {
            lines.push(self.row_line(row));
        }
        lines.push(self.border('└', '┴', '┘'));
        lines
    }

    fn border(&self, left: char, mid: char, right: char) -> String {
        let segments: Vec<String> = self.widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{left}{}{right}", segments.join(&mid.to_string()))
    }

    fn row_line<S: AsRef<str>>(&self, cells: &[S]) -> String {
        let cells: Vec<String> = self
            .widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                let cell = cells.get(i).map(AsRef::as_ref).unwrap_or("");
                format!(" {} ", truncate(cell, *width))
            })
            .collect();
        format!("│{}│", cells.join("│"))
    }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) to safely handle UTF-8 strings
/// including emoji and multi-byte characters.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Vec<String>> {
        vec![
            vec!["s1".to_string(), "1".to_string()],
            vec!["web-frontend-01".to_string(), "12".to_string()],
        ]
    }

    #[test]
    fn test_columns_fit_widest_cell() {
        let table = TableFormatter::new(&["Server", "OK"], &rows(), 40);
        let lines = table.render(&rows());

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "┌─────────────────┬────┐");
        assert_eq!(lines[1], "│ Server          │ OK │");
        assert_eq!(lines[3], "│ s1              │ 1  │");
        assert_eq!(lines[5], "└─────────────────┴────┘");
        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
    }

    #[test]
    fn test_long_cells_are_truncated() {
        let table = TableFormatter::new(&["Server", "OK"], &rows(), 8);
        let lines = table.render(&rows());

        assert_eq!(lines[4], "│ web-f... │ 12 │");
    }

    #[test]
    fn test_empty_table_has_header_only() {
        let table = TableFormatter::new(&["Server", "OK"], &[], 40);
        let lines = table.render(&[]);

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "│ Server │ OK │");
    }

    #[test]
    fn test_truncate_pads_short_strings() {
        assert_eq!(truncate("ok", 5), "ok   ");
        assert_eq!(truncate("abcdefgh", 6), "abc...");
        assert_eq!(truncate("日本語テキスト", 5), "日本...");
    }
}
