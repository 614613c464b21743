//! Reading `git diff` output into entries with pre-computed scripts.
//!
//! Each `diff --git` block becomes one [`Entry`] whose script is rebuilt from
//! the hunk bodies. Hunk headers supply the starting line numbers, so the ops
//! carry real positions even though context outside the hunks is absent.

use std::collections::HashMap;

use tracing::debug;

use crate::aggregate::{Entry, EntryStatus};
use crate::error::{DiffError, DiffResult};
use crate::sequence::{EditOp, EditScript};

/// A file block being assembled.
struct Block {
    identifier: String,
    status: EntryStatus,
    ops: Vec<EditOp>,
    hunk: Option<Hunk>,
    seen_hunk: bool,
}

/// Position inside the current hunk.
struct Hunk {
    old_next: usize,
    new_next: usize,
    old_remaining: usize,
    new_remaining: usize,
}

impl Hunk {
    fn is_exhausted(&self) -> bool {
        self.old_remaining == 0 && self.new_remaining == 0
    }
}

impl Block {
    fn into_entry(self) -> Entry {
        Entry::script(self.identifier, self.status, EditScript::from_ops(self.ops))
    }
}

/// Parse unified diff text as produced by `git diff` / `git show`.
///
/// Lines before the first `diff --git` header are ignored. Blocks whose
/// header has no `b/` path are skipped.
pub fn parse_unified_diff(text: &str) -> DiffResult<Vec<Entry>> {
    let mut entries = Vec::new();
    let mut current: Option<Block> = None;

    // Only `\n` ends a line; a `\r` before it belongs to the content.
    let lines = text
        .split_inclusive('\n')
        .map(|line| line.strip_suffix('\n').unwrap_or(line));

    for (idx, line) in lines.enumerate() {
        let line_no = idx + 1;

        if let Some(header) = line.strip_prefix("diff --git ") {
            if let Some(block) = current.take() {
                entries.push(block.into_entry());
            }
            current = match header.rsplit_once(" b/") {
                Some((_, path)) => Some(Block {
                    identifier: path.to_string(),
                    status: EntryStatus::Modified,
                    ops: Vec::new(),
                    hunk: None,
                    seen_hunk: false,
                }),
                None => {
                    debug!(line = line_no, "skipping diff block without b/ path");
                    None
                }
            };
            continue;
        }

        let Some(block) = current.as_mut() else {
            continue;
        };

        if line.starts_with("@@") {
            let (old_start, old_count, new_start, new_count) =
                parse_hunk_header(line).ok_or_else(|| DiffError::MalformedHunkHeader {
                    line: line_no,
                    header: line.to_string(),
                })?;
            block.hunk = Some(Hunk {
                old_next: old_start,
                new_next: new_start,
                old_remaining: old_count,
                new_remaining: new_count,
            });
            block.seen_hunk = true;
            continue;
        }

        match block.hunk.as_mut() {
            Some(hunk) => {
                if line.starts_with('\\') {
                    continue;
                }
                read_hunk_line(hunk, &mut block.ops, line);
                if hunk.is_exhausted() {
                    block.hunk = None;
                }
            }
            None if !block.seen_hunk => {
                if line.starts_with("new file mode") {
                    block.status = EntryStatus::Added;
                } else if line.starts_with("deleted file mode") {
                    block.status = EntryStatus::Deleted;
                }
            }
            None => {
                if line.starts_with(['+', '-', ' ']) {
                    return Err(DiffError::ContentOutsideHunk { line: line_no });
                }
            }
        }
    }

    if let Some(block) = current {
        entries.push(block.into_entry());
    }

    debug!(entries = entries.len(), "parsed unified diff");
    Ok(entries)
}

fn read_hunk_line(hunk: &mut Hunk, ops: &mut Vec<EditOp>, line: &str) {
    if let Some(content) = line.strip_prefix('+') {
        ops.push(EditOp::insert(content, hunk.new_next));
        hunk.new_next += 1;
        hunk.new_remaining = hunk.new_remaining.saturating_sub(1);
    } else if let Some(content) = line.strip_prefix('-') {
        ops.push(EditOp::delete(content, hunk.old_next));
        hunk.old_next += 1;
        hunk.old_remaining = hunk.old_remaining.saturating_sub(1);
    } else {
        // Editors sometimes strip the lone space of an empty context line.
        let content = line.strip_prefix(' ').unwrap_or(line);
        ops.push(EditOp::equal(content, hunk.old_next, hunk.new_next));
        hunk.old_next += 1;
        hunk.new_next += 1;
        hunk.old_remaining = hunk.old_remaining.saturating_sub(1);
        hunk.new_remaining = hunk.new_remaining.saturating_sub(1);
    }
}

/// Parse `@@ -a[,b] +c[,d] @@ ...` into `(a, b, c, d)`.
fn parse_hunk_header(line: &str) -> Option<(usize, usize, usize, usize)> {
    let rest = line.strip_prefix("@@ -")?;
    let (ranges, _) = rest.split_once(" @@")?;
    let (old, new) = ranges.split_once(" +")?;
    let (old_start, old_count) = parse_range(old)?;
    let (new_start, new_count) = parse_range(new)?;
    Some((old_start, old_count, new_start, new_count))
}

fn parse_range(range: &str) -> Option<(usize, usize)> {
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

/// Parse `git diff --name-status` output into `(status, path)` pairs.
///
/// `A` is added, `D` deleted, every other code (`M`, `R100`, `T`, ...) is
/// modified. For renames and copies the path is the destination.
pub fn parse_name_status(text: &str) -> Vec<(EntryStatus, String)> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let (code, paths) = line.split_once('\t')?;
            let path = paths.rsplit('\t').next().unwrap_or(paths);
            let status = match code.trim() {
                "A" => EntryStatus::Added,
                "D" => EntryStatus::Deleted,
                _ => EntryStatus::Modified,
            };
            Some((status, path.to_string()))
        })
        .collect()
}

/// Overwrite entry statuses with those from a name-status listing.
///
/// Entries whose identifier is not listed keep their current status.
pub fn apply_name_status(entries: &mut [Entry], statuses: &[(EntryStatus, String)]) {
    let by_path: HashMap<&str, EntryStatus> = statuses
        .iter()
        .map(|(status, path)| (path.as_str(), *status))
        .collect();

    for entry in entries.iter_mut() {
        if let Some(status) = by_path.get(entry.identifier.as_str()) {
            entry.status = *status;
        }
    }
}
