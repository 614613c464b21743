//! Terminal rendering of aggregate reports.

use colored::{ColoredString, Colorize};
use lexdiff_diff::{AggregateReport, AlignedRow, Cell, EditKind, EntryStatus, ReportRow, UnifiedRow};

use crate::config::{Layout, RenderConfig};

pub fn render_report(report: &AggregateReport, config: &RenderConfig) -> String {
    let mut out = match config.layout {
        Layout::Unified => render_unified(report, config),
        Layout::SideBySide => render_side_by_side(report, config),
    };
    let stats = report.stats();
    let summary = format!(
        "{} changed, {} insertions(+), {} deletions(-)",
        plural(stats.files_changed, "file"),
        stats.additions,
        stats.deletions
    );
    out.push_str(&paint(config.color, &summary, |s| s.bold()));
    out.push('\n');
    out
}

fn render_unified(report: &AggregateReport, config: &RenderConfig) -> String {
    let mut out = String::new();
    for row in report.unified_rows() {
        let line = match row {
            ReportRow::Header { identifier, status, additions, deletions } => {
                header_line(config, &identifier, status, additions, deletions)
            }
            ReportRow::Line(row) => unified_line(config, &row),
            ReportRow::Notice { omitted } => notice_line(config, omitted),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn render_side_by_side(report: &AggregateReport, config: &RenderConfig) -> String {
    let mut out = String::new();
    for row in report.side_by_side_rows() {
        let line = match row {
            ReportRow::Header { identifier, status, .. } => {
                // The identifier spans both columns.
                let title = format!("{identifier} ({status})");
                let left = fit(&title, config.column_width + 6);
                let both = format!("{left} │ {}", fit(&title, config.column_width + 6));
                paint(config.color, &both, |s| s.bold().cyan())
            }
            ReportRow::Line(row) => aligned_line(config, &row),
            ReportRow::Notice { omitted } => notice_line(config, omitted),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn header_line(
    config: &RenderConfig,
    identifier: &str,
    status: EntryStatus,
    additions: usize,
    deletions: usize,
) -> String {
    let title = paint(config.color, &format!("── {identifier} ({status})"), |s| s.bold().cyan());
    let adds = paint(config.color, &format!("+{additions}"), |s| s.green());
    let dels = paint(config.color, &format!("-{deletions}"), |s| s.red());
    format!("{title} {adds} {dels}")
}

fn unified_line(config: &RenderConfig, row: &UnifiedRow) -> String {
    let text = format!("{}{:>5} │ {}", row.kind.marker(), row.line_number, row.content);
    match row.kind {
        EditKind::Insert => paint(config.color, &text, |s| s.green()),
        EditKind::Delete => paint(config.color, &text, |s| s.red()),
        EditKind::Equal => text,
    }
}

fn aligned_line(config: &RenderConfig, row: &AlignedRow) -> String {
    let left = cell_text(row.left.as_ref(), config.column_width);
    let right = cell_text(row.right.as_ref(), config.column_width);
    let (left, right) = match row.kind() {
        EditKind::Delete => (paint(config.color, &left, |s| s.red()), right),
        EditKind::Insert => (left, paint(config.color, &right, |s| s.green())),
        EditKind::Equal => (left, right),
    };
    format!("{left} │ {right}")
}

fn cell_text(cell: Option<&Cell>, width: usize) -> String {
    match cell {
        Some(cell) => format!("{:>5} {}", cell.line_number, fit(&cell.content, width)),
        None => " ".repeat(width + 6),
    }
}

fn notice_line(config: &RenderConfig, omitted: usize) -> String {
    let text = format!("… {} not shown", plural(omitted, "more entry"));
    paint(config.color, &text, |s| s.yellow())
}

/// Pad or truncate to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{text}{}", " ".repeat(width - count))
    } else if width == 0 {
        String::new()
    } else {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('…');
        cut
    }
}

fn plural(n: usize, noun: &str) -> String {
    match (n, noun.strip_suffix('y')) {
        (1, _) => format!("{n} {noun}"),
        (_, Some(stem)) => format!("{n} {stem}ies"),
        (_, None) => format!("{n} {noun}s"),
    }
}

fn paint(enabled: bool, text: &str, style: impl FnOnce(&str) -> ColoredString) -> String {
    if enabled {
        style(text).to_string()
    } else {
        text.to_string()
    }
}
