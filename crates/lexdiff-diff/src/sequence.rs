//! Sequence-level diff: LCS alignment of two line sequences.
//!
//! Builds the full longest-common-subsequence score table and walks it back
//! from the bottom-right corner with plain index variables, so the depth of
//! the walk never touches the call stack.
//!
//! # Invariants
//!
//! - Every old line appears in exactly one `Equal` or `Delete` op.
//! - Every new line appears in exactly one `Equal` or `Insert` op.
//! - When two moves score the same, the insertion is taken first.

use serde::Serialize;
use tracing::debug;

/// The kind of a single line operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    /// The line is present in both versions.
    Equal,
    /// The line only exists in the new version.
    Insert,
    /// The line only exists in the old version.
    Delete,
}

impl EditKind {
    /// Marker used by unified text renderings.
    pub fn marker(&self) -> char {
        match self {
            EditKind::Equal => ' ',
            EditKind::Insert => '+',
            EditKind::Delete => '-',
        }
    }
}

/// One line of an edit script.
///
/// Line numbers are 1-based. `Equal` ops carry both, `Insert` only the new
/// one and `Delete` only the old one; the constructors enforce the pairing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditOp {
    kind: EditKind,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    old_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_line: Option<usize>,
}

impl EditOp {
    pub fn equal(content: impl Into<String>, old_line: usize, new_line: usize) -> Self {
        Self {
            kind: EditKind::Equal,
            content: content.into(),
            old_line: Some(old_line),
            new_line: Some(new_line),
        }
    }

    pub fn insert(content: impl Into<String>, new_line: usize) -> Self {
        Self {
            kind: EditKind::Insert,
            content: content.into(),
            old_line: None,
            new_line: Some(new_line),
        }
    }

    pub fn delete(content: impl Into<String>, old_line: usize) -> Self {
        Self {
            kind: EditKind::Delete,
            content: content.into(),
            old_line: Some(old_line),
            new_line: None,
        }
    }

    pub fn kind(&self) -> EditKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn old_line(&self) -> Option<usize> {
        self.old_line
    }

    pub fn new_line(&self) -> Option<usize> {
        self.new_line
    }
}

/// An ordered sequence of line operations turning one text into another.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EditScript {
    ops: Vec<EditOp>,
}

impl EditScript {
    /// Create an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap ops produced elsewhere (e.g. parsed from a patch).
    ///
    /// The caller is responsible for the ops covering both sides consistently.
    pub fn from_ops(ops: Vec<EditOp>) -> Self {
        Self { ops }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EditOp> {
        self.ops.iter()
    }

    /// Number of ops of the given kind.
    pub fn count(&self, kind: EditKind) -> usize {
        self.ops.iter().filter(|op| op.kind == kind).count()
    }

    /// Number of inserted lines.
    pub fn additions(&self) -> usize {
        self.count(EditKind::Insert)
    }

    /// Number of deleted lines.
    pub fn deletions(&self) -> usize {
        self.count(EditKind::Delete)
    }

    /// Returns `true` if the script contains no insertions or deletions.
    pub fn is_unchanged(&self) -> bool {
        self.ops.iter().all(|op| op.kind == EditKind::Equal)
    }

    /// The old sequence, recovered from `Equal` and `Delete` ops.
    pub fn old_lines(&self) -> Vec<&str> {
        self.side(EditKind::Delete)
    }

    /// The new sequence, recovered from `Equal` and `Insert` ops.
    pub fn new_lines(&self) -> Vec<&str> {
        self.side(EditKind::Insert)
    }

    fn side(&self, changed: EditKind) -> Vec<&str> {
        self.ops
            .iter()
            .filter(|op| op.kind == EditKind::Equal || op.kind == changed)
            .map(|op| op.content.as_str())
            .collect()
    }
}

impl FromIterator<EditOp> for EditScript {
    fn from_iter<I: IntoIterator<Item = EditOp>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a EditScript {
    type Item = &'a EditOp;
    type IntoIter = std::slice::Iter<'a, EditOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl AsRef<[EditOp]> for EditScript {
    fn as_ref(&self) -> &[EditOp] {
        &self.ops
    }
}

/// Split a text into lines on `'\n'`.
///
/// Absent text and the empty string both yield no lines. No other
/// normalization happens: a trailing newline produces a trailing empty line
/// and `'\r'` is kept as content.
pub fn split_lines(text: Option<&str>) -> Vec<&str> {
    match text {
        None | Some("") => Vec::new(),
        Some(text) => text.split('\n').collect(),
    }
}

/// Diff two texts line by line.
///
/// `None` is a valid input and is treated as an empty text.
pub fn diff(old: Option<&str>, new: Option<&str>) -> EditScript {
    diff_lines(&split_lines(old), &split_lines(new))
}

/// Diff two line sequences.
pub fn diff_lines<S: AsRef<str>>(old: &[S], new: &[S]) -> EditScript {
    let (m, n) = (old.len(), new.len());

    if m == 0 {
        return new
            .iter()
            .enumerate()
            .map(|(j, line)| EditOp::insert(line.as_ref(), j + 1))
            .collect();
    }
    if n == 0 {
        return old
            .iter()
            .enumerate()
            .map(|(i, line)| EditOp::delete(line.as_ref(), i + 1))
            .collect();
    }

    let table = LcsTable::build(old, new);
    let common = table.score(m, n);
    debug!(old = m, new = n, lcs = common, "computed LCS table");

    let mut ops = Vec::with_capacity(m + n - common);
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old[i - 1].as_ref() == new[j - 1].as_ref() {
            ops.push(EditOp::equal(old[i - 1].as_ref(), i, j));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || table.score(i, j - 1) >= table.score(i - 1, j)) {
            ops.push(EditOp::insert(new[j - 1].as_ref(), j));
            j -= 1;
        } else {
            ops.push(EditOp::delete(old[i - 1].as_ref(), i));
            i -= 1;
        }
    }

    // The walk runs tail-to-head.
    ops.reverse();
    EditScript { ops }
}

/// Row-major `(m + 1) x (n + 1)` table of prefix LCS lengths.
struct LcsTable {
    cols: usize,
    cells: Vec<u32>,
}

impl LcsTable {
    fn build<S: AsRef<str>>(old: &[S], new: &[S]) -> Self {
        let cols = new.len() + 1;
        let mut cells = vec![0u32; (old.len() + 1) * cols];

        for i in 1..=old.len() {
            for j in 1..=new.len() {
                cells[i * cols + j] = if old[i - 1].as_ref() == new[j - 1].as_ref() {
                    cells[(i - 1) * cols + j - 1] + 1
                } else {
                    cells[(i - 1) * cols + j].max(cells[i * cols + j - 1])
                };
            }
        }

        Self { cols, cells }
    }

    fn score(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.cols + j] as usize
    }
}
