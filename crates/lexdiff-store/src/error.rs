use std::path::PathBuf;

/// Errors from text retrieval.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying backend.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored bytes are not UTF-8 text.
    #[error("{0} is not valid UTF-8 text")]
    InvalidUtf8(PathBuf),

    /// A requested path is absolute or climbs out of the source root.
    #[error("path escapes source root: {0}")]
    PathEscapesRoot(String),

    /// The source root does not exist or is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Walking the directory tree failed.
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
