//! Projections of an edit script into render-ready rows.
//!
//! Both projections map ops 1:1 to rows in script order. Adjacent deletions
//! and insertions are never folded into a shared side-by-side row.

use serde::Serialize;

use crate::sequence::{EditKind, EditOp, EditScript};

/// A single-track row: one marker, one line number, one line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedRow {
    pub kind: EditKind,
    /// Old number for deletions, new number for insertions and equal lines.
    pub line_number: usize,
    pub content: String,
}

/// One populated side of an [`AlignedRow`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub content: String,
    pub line_number: usize,
}

/// A two-track row pairing an old-side cell with a new-side cell.
///
/// `None` marks the placeholder side of an insertion or deletion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AlignedRow {
    pub left: Option<Cell>,
    pub right: Option<Cell>,
}

impl AlignedRow {
    /// The kind of op this row was produced from.
    pub fn kind(&self) -> EditKind {
        match (&self.left, &self.right) {
            (Some(_), None) => EditKind::Delete,
            (None, Some(_)) => EditKind::Insert,
            _ => EditKind::Equal,
        }
    }
}

impl From<&EditOp> for UnifiedRow {
    fn from(op: &EditOp) -> Self {
        let line_number = match op.kind() {
            EditKind::Delete => op.old_line(),
            EditKind::Insert | EditKind::Equal => op.new_line(),
        };
        Self {
            kind: op.kind(),
            line_number: line_number.unwrap_or_default(),
            content: op.content().to_string(),
        }
    }
}

impl From<&EditOp> for AlignedRow {
    fn from(op: &EditOp) -> Self {
        let cell = |line: Option<usize>| {
            line.map(|line_number| Cell {
                content: op.content().to_string(),
                line_number,
            })
        };
        Self {
            left: cell(op.old_line()),
            right: cell(op.new_line()),
        }
    }
}

/// Single-track projection of a script.
pub fn to_unified(script: &EditScript) -> Vec<UnifiedRow> {
    script.iter().map(UnifiedRow::from).collect()
}

/// Two-track projection of a script.
pub fn to_side_by_side(script: &EditScript) -> Vec<AlignedRow> {
    script.iter().map(AlignedRow::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::{diff, diff_lines};

    fn cell(content: &str, line_number: usize) -> Option<Cell> {
        Some(Cell {
            content: content.into(),
            line_number,
        })
    }

    #[test]
    fn unified_uses_side_specific_line_numbers() {
        let script = diff_lines(&["x", "y"], &["y", "x"]);
        let rows = to_unified(&script);

        let summary: Vec<(EditKind, usize, &str)> = rows
            .iter()
            .map(|r| (r.kind, r.line_number, r.content.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (EditKind::Delete, 1, "x"),
                (EditKind::Equal, 1, "y"),
                (EditKind::Insert, 2, "x"),
            ]
        );
    }

    #[test]
    fn side_by_side_places_placeholders() {
        let script = diff(Some("a\nb\nc"), Some("a\nB\nc"));
        let rows = to_side_by_side(&script);

        assert_eq!(
            rows,
            vec![
                AlignedRow { left: cell("a", 1), right: cell("a", 1) },
                AlignedRow { left: cell("b", 2), right: None },
                AlignedRow { left: None, right: cell("B", 2) },
                AlignedRow { left: cell("c", 3), right: cell("c", 3) },
            ]
        );
        let kinds: Vec<EditKind> = rows.iter().map(AlignedRow::kind).collect();
        assert_eq!(
            kinds,
            vec![EditKind::Equal, EditKind::Delete, EditKind::Insert, EditKind::Equal]
        );
    }

    #[test]
    fn projections_are_one_to_one() {
        let script = diff(Some("1\n2\n3\n4"), Some("0\n2\n4\n5\n6"));
        assert_eq!(to_side_by_side(&script).len(), script.len());
        assert_eq!(to_unified(&script).len(), script.len());
    }

    #[test]
    fn projections_are_repeatable() {
        let script = diff(Some("a\nb"), Some("b\nc"));
        assert_eq!(to_unified(&script), to_unified(&script));
        assert_eq!(to_side_by_side(&script), to_side_by_side(&script));
    }

    #[test]
    fn empty_script_projects_to_nothing() {
        let script = diff(None, None);
        assert!(to_unified(&script).is_empty());
        assert!(to_side_by_side(&script).is_empty());
    }
}
