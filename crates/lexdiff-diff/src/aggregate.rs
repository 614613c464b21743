//! Multi-entry aggregation: one diff per named entry, folded into a report.
//!
//! Entries keep the order the caller supplied them in. Every entry is diffed
//! and counted in the totals; `max_entries` only limits which entries are
//! rendered as rows, the rest being summarized by a trailing notice.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DiffResult;
use crate::projection::{to_side_by_side, to_unified, AlignedRow, UnifiedRow};
use crate::sequence::{diff, EditScript};

/// What happened to an entry between the two versions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Added,
    Modified,
    Deleted,
    Unchanged,
}

impl EntryStatus {
    /// Derive a status from which sides are present.
    pub fn infer(old: Option<&str>, new: Option<&str>) -> Self {
        match (old, new) {
            (None, Some(_)) => EntryStatus::Added,
            (Some(_), None) => EntryStatus::Deleted,
            (Some(old), Some(new)) if old == new => EntryStatus::Unchanged,
            (None, None) => EntryStatus::Unchanged,
            _ => EntryStatus::Modified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Added => "added",
            EntryStatus::Modified => "modified",
            EntryStatus::Deleted => "deleted",
            EntryStatus::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an entry's edit script comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntrySource {
    /// Both versions' texts; `None` is diffed as an empty text.
    Texts {
        old: Option<String>,
        new: Option<String>,
    },
    /// A script computed elsewhere, e.g. read from a patch.
    Script(EditScript),
}

/// One named unit to diff, as supplied by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub identifier: String,
    pub status: EntryStatus,
    pub source: EntrySource,
}

impl Entry {
    pub fn texts(
        identifier: impl Into<String>,
        status: EntryStatus,
        old: Option<String>,
        new: Option<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            status,
            source: EntrySource::Texts { old, new },
        }
    }

    /// Like [`Entry::texts`], with the status derived by [`EntryStatus::infer`].
    pub fn inferred(identifier: impl Into<String>, old: Option<String>, new: Option<String>) -> Self {
        let status = EntryStatus::infer(old.as_deref(), new.as_deref());
        Self::texts(identifier, status, old, new)
    }

    pub fn script(identifier: impl Into<String>, status: EntryStatus, script: EditScript) -> Self {
        Self {
            identifier: identifier.into(),
            status,
            source: EntrySource::Script(script),
        }
    }
}

/// The diff of a single entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDiff {
    pub identifier: String,
    pub status: EntryStatus,
    pub additions: usize,
    pub deletions: usize,
    pub script: EditScript,
}

impl EntryDiff {
    /// Diff an entry.
    ///
    /// A `Modified` entry whose script holds no changes is reported as
    /// `Unchanged`; other statuses are kept as given.
    pub fn from_entry(entry: Entry) -> Self {
        let script = match entry.source {
            EntrySource::Texts { old, new } => diff(old.as_deref(), new.as_deref()),
            EntrySource::Script(script) => script,
        };
        let (additions, deletions) = (script.additions(), script.deletions());
        let status = match entry.status {
            EntryStatus::Modified if additions == 0 && deletions == 0 => EntryStatus::Unchanged,
            status => status,
        };

        Self {
            identifier: entry.identifier,
            status,
            additions,
            deletions,
            script,
        }
    }

    pub fn unified(&self) -> Vec<UnifiedRow> {
        to_unified(&self.script)
    }

    pub fn side_by_side(&self) -> Vec<AlignedRow> {
        to_side_by_side(&self.script)
    }
}

/// Summed counts across a report's entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
    /// Entries whose status is not `Unchanged`.
    pub files_changed: usize,
}

impl DiffStats {
    fn from_entries(entries: &[EntryDiff]) -> Self {
        entries.iter().fold(Self::default(), |mut stats, entry| {
            stats.additions += entry.additions;
            stats.deletions += entry.deletions;
            if entry.status != EntryStatus::Unchanged {
                stats.files_changed += 1;
            }
            stats
        })
    }
}

/// A row of a multi-entry rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ReportRow<R> {
    /// Separator preceding an entry's rows; shown across both columns.
    Header {
        identifier: String,
        status: EntryStatus,
        additions: usize,
        deletions: usize,
    },
    /// A projected line of the current entry.
    Line(R),
    /// Trailing note for entries dropped by the cap.
    Notice { omitted: usize },
}

/// Ordered per-entry diffs plus totals.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    entries: Vec<EntryDiff>,
    stats: DiffStats,
    omitted: usize,
}

impl AggregateReport {
    pub fn entries(&self) -> &[EntryDiff] {
        &self.entries
    }

    pub fn stats(&self) -> DiffStats {
        self.stats
    }

    pub fn total_additions(&self) -> usize {
        self.stats.additions
    }

    pub fn total_deletions(&self) -> usize {
        self.stats.deletions
    }

    /// Number of entries left out of the rendered rows by the cap.
    pub fn omitted(&self) -> usize {
        self.omitted
    }

    /// The leading entries that are rendered as rows.
    pub fn shown(&self) -> &[EntryDiff] {
        &self.entries[..self.entries.len() - self.omitted]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Side-by-side rows for every shown entry, each preceded by a header row.
    pub fn side_by_side_rows(&self) -> Vec<ReportRow<AlignedRow>> {
        self.rows(EntryDiff::side_by_side)
    }

    /// Unified rows for every shown entry, each preceded by a header row.
    pub fn unified_rows(&self) -> Vec<ReportRow<UnifiedRow>> {
        self.rows(EntryDiff::unified)
    }

    fn rows<R>(&self, project: impl Fn(&EntryDiff) -> Vec<R>) -> Vec<ReportRow<R>> {
        let mut rows = Vec::new();
        for entry in self.shown() {
            rows.push(ReportRow::Header {
                identifier: entry.identifier.clone(),
                status: entry.status,
                additions: entry.additions,
                deletions: entry.deletions,
            });
            rows.extend(project(entry).into_iter().map(ReportRow::Line));
        }
        if self.omitted > 0 {
            rows.push(ReportRow::Notice {
                omitted: self.omitted,
            });
        }
        rows
    }

    /// Pretty-printed JSON export of the whole report.
    pub fn to_json(&self) -> DiffResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Diff every entry and fold the results into a report.
///
/// With `max_entries = Some(k)` the totals still cover every entry, but only
/// the first `k` are rendered as rows; the remainder is counted in
/// [`AggregateReport::omitted`].
pub fn aggregate(
    entries: impl IntoIterator<Item = Entry>,
    max_entries: Option<usize>,
) -> AggregateReport {
    let diffs: Vec<EntryDiff> = entries.into_iter().map(EntryDiff::from_entry).collect();
    let omitted = max_entries.map_or(0, |max| diffs.len().saturating_sub(max));

    let stats = DiffStats::from_entries(&diffs);
    debug!(
        entries = diffs.len(),
        omitted,
        additions = stats.additions,
        deletions = stats.deletions,
        "aggregated report"
    );

    AggregateReport {
        entries: diffs,
        stats,
        omitted,
    }
}
