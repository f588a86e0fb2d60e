//! I/O error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File I/O error with the path that caused it.
    #[error("I/O error on {}: {source}", .path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid file format.
    #[error("invalid file format: {0}")]
    InvalidFormat(String),

    /// Invalid run configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Range scan saw no hits at all.
    #[error("no hits found in {0} file(s); cannot derive an energy range")]
    EmptyDataset(usize),

    /// File-level failure (header, column lookup) with the file it concerns.
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// Row-level failure with its location.
    #[error("{}: row {row} (line {line}): {source}", .path.display())]
    Row {
        path: PathBuf,
        row: usize,
        line: usize,
        #[source]
        source: Box<Error>,
    },

    /// clist table or pixel-string error.
    #[error("clist error: {0}")]
    Clist(#[from] clusterpix_clist::Error),

    /// Core library error.
    #[error("core error: {0}")]
    CoreError(#[from] clusterpix_core::Error),

    /// JSON configuration error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Attaches a file path to a bare I/O error.
    pub(crate) fn at_path(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Path { path, source }
    }

    /// Wraps a file-level failure with the file path.
    pub(crate) fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Self::File {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// Wraps a row-level failure with its location.
    pub(crate) fn in_row(self, path: impl Into<PathBuf>, row: usize, line: usize) -> Self {
        Self::Row {
            path: path.into(),
            row,
            line,
            source: Box::new(self),
        }
    }
}
