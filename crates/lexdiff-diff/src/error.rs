//! Error types for the diff crate.
//!
//! The engine itself is total; only reading externally produced patch text
//! and serializing reports can fail.

/// Errors that can occur while reading patches or exporting reports.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A `@@ -a,b +c,d @@` hunk header could not be parsed.
    #[error("malformed hunk header at line {line}: {header:?}")]
    MalformedHunkHeader { line: usize, header: String },

    /// A hunk body line appeared before any `@@` header in its file block.
    #[error("hunk content outside of a hunk at line {line}")]
    ContentOutsideHunk { line: usize },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
