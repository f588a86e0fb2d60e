//! clist-specific error types.

use thiserror::Error;

/// Result type for clist operations.
pub type Result<T> = std::result::Result<T, Error>;

/// What went wrong while tokenizing a cluster-pixel string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Nothing but whitespace.
    #[error("empty pixel string")]
    Empty,

    /// A specific character was required.
    #[error("expected '{expected}', found '{found}'")]
    Expected { expected: char, found: char },

    /// Input ended inside a group.
    #[error("unexpected end of input, expected '{0}'")]
    UnexpectedEnd(char),

    /// A group with other than four fields.
    #[error("pixel group has {0} fields, expected 4 (x, y, E, t)")]
    Arity(usize),

    /// A field that is not a number of the required kind.
    #[error("invalid {field} value '{literal}'")]
    InvalidNumber { field: &'static str, literal: String },
}

/// Structured tokenizer failure with the byte offset it occurred at.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at byte {offset}")]
pub struct ParseError {
    /// Failure category.
    pub kind: ParseErrorKind,
    /// Byte offset into the pixel string.
    pub offset: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// clist error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed cluster-pixel string.
    #[error("pixel parse error: {0}")]
    Parse(#[from] ParseError),

    /// Header does not name the requested column.
    #[error("missing column '{0}' in header")]
    MissingColumn(String),

    /// Structurally broken table.
    #[error("invalid clist format: {0}")]
    InvalidFormat(String),
}
