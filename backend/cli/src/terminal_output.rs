//! Terminal output utilities: notes, ANSI colors and simple tables.

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

/// Wrap `text` in `color` when the terminal supports it.
pub fn paint(text: &str, color: &str) -> String {
    if supports_color() {
        format!("{color}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Strip ANSI escape codes from a string.
pub fn strip_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    Info,
    Warn,
    Error,
    Success,
}

impl NoteKind {
    fn glyph(self) -> (&'static str, &'static str) {
        match self {
            NoteKind::Info => (CYAN, "ℹ"),
            NoteKind::Warn => (YELLOW, "⚠"),
            NoteKind::Error => (RED, "✗"),
            NoteKind::Success => (GREEN, "✓"),
        }
    }

    fn label(self) -> &'static str {
        match self {
            NoteKind::Info => "INFO",
            NoteKind::Warn => "WARN",
            NoteKind::Error => "ERROR",
            NoteKind::Success => "OK",
        }
    }
}

/// Format a one-line note, with a colored glyph or a plain `LABEL:` prefix.
pub fn format_note(kind: NoteKind, msg: &str, color: bool) -> String {
    if color {
        let (code, glyph) = kind.glyph();
        format!("{code}{BOLD}{glyph}{RESET} {msg}")
    } else {
        format!("{}: {msg}", kind.label())
    }
}

/// Errors go to stderr so progress output stays pipeable.
pub fn note(kind: NoteKind, msg: &str) {
    let line = format_note(kind, msg, supports_color());
    if kind == NoteKind::Error {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

pub fn note_info(msg: &str) {
    note(NoteKind::Info, msg);
}

pub fn note_warn(msg: &str) {
    note(NoteKind::Warn, msg);
}

pub fn note_error(msg: &str) {
    note(NoteKind::Error, msg);
}

pub fn note_success(msg: &str) {
    note(NoteKind::Success, msg);
}

pub enum Align {
    Left,
    Right,
}

pub struct Column {
    pub header: String,
    pub align: Align,
    pub max_width: Option<usize>,
}

impl Column {
    pub fn left(header: impl Into<String>) -> Self {
        Self { header: header.into(), align: Align::Left, max_width: None }
    }

    pub fn right(header: impl Into<String>) -> Self {
        Self { header: header.into(), align: Align::Right, max_width: None }
    }

    pub fn max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }
}

/// Render a table with given columns and rows. Cells longer than a column's
/// `max_width` are cut with an ellipsis.
pub fn render_table(columns: &[Column], rows: &[Vec<String>]) -> String {
    let num_cols = columns.len();
    let mut widths: Vec<usize> = columns.iter().map(|c| visible_len(&c.header)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(num_cols) {
            let w = visible_len(cell);
            let w = columns[i].max_width.map_or(w, |max| w.min(max));
            widths[i] = widths[i].max(w);
        }
    }

    let mut out = String::new();

    let header_cells: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| pad_cell(&col.header, widths[i], &col.align))
        .collect();
    if supports_color() {
        out.push_str(&format!("{BOLD}  {}  {RESET}\n", header_cells.join("  ")));
    } else {
        out.push_str(&format!("  {}  \n", header_cells.join("  ")));
    }

    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("  {}  \n", sep.join("  ")));

    for row in rows {
        let cells: Vec<String> = (0..num_cols)
            .map(|i| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                pad_cell(&truncate(cell, widths[i]), widths[i], &columns[i].align)
            })
            .collect();
        out.push_str(&format!("  {}  \n", cells.join("  ")));
    }

    out
}

fn visible_len(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

fn truncate(s: &str, width: usize) -> String {
    let plain = strip_ansi(s);
    if plain.chars().count() <= width {
        return s.to_string();
    }
    let mut cut: String = plain.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn pad_cell(s: &str, width: usize, align: &Align) -> String {
    let pad = width.saturating_sub(visible_len(s));
    match align {
        Align::Left => format!("{s}{}", " ".repeat(pad)),
        Align::Right => format!("{}{s}", " ".repeat(pad)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_ansi() {
        let colored = format!("{GREEN}hello{RESET}");
        assert_eq!(strip_ansi(&colored), "hello");
    }

    #[test]
    fn plain_notes_use_labels() {
        assert_eq!(format_note(NoteKind::Warn, "slow down", false), "WARN: slow down");
        let colored = format_note(NoteKind::Success, "done", true);
        assert_eq!(strip_ansi(&colored), "✓ done");
    }

    #[test]
    fn renders_and_truncates() {
        let cols = vec![Column::right("#"), Column::left("Name").max_width(8)];
        let rows = vec![
            vec!["0".to_string(), "Ber Rune".to_string()],
            vec!["12".to_string(), "Harlequin Crest".to_string()],
        ];
        let table = strip_ansi(&render_table(&cols, &rows));
        assert!(table.contains("Ber Rune"));
        assert!(table.contains("Harlequ…"));
        assert!(!table.contains("Harlequin Crest"));
    }
}
