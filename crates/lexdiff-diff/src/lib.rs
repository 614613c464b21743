//! Line-level diff engine.
//!
//! Aligns two line sequences through a longest-common-subsequence table,
//! projects the resulting edit script into renderer-neutral rows, and folds
//! several per-document diffs into one report.
//!
//! # Key Types
//!
//! - [`EditScript`] / [`EditOp`] / [`EditKind`] -- ordered line operations from [`diff`]
//! - [`UnifiedRow`] / [`AlignedRow`] -- single-track and two-track projections
//! - [`Entry`] / [`EntryDiff`] / [`AggregateReport`] -- multi-entry aggregation
//! - [`parse_unified_diff`] -- entries with pre-computed scripts from `git diff` output

pub mod aggregate;
pub mod error;
pub mod patch;
pub mod projection;
pub mod sequence;

pub use aggregate::{
    aggregate, AggregateReport, DiffStats, Entry, EntryDiff, EntrySource, EntryStatus, ReportRow,
};
pub use error::{DiffError, DiffResult};
pub use patch::{apply_name_status, parse_name_status, parse_unified_diff};
pub use projection::{to_side_by_side, to_unified, AlignedRow, Cell, UnifiedRow};
pub use sequence::{diff, diff_lines, split_lines, EditKind, EditOp, EditScript};
