//! Error types for clusterpix-core.

use thiserror::Error;

/// Result type alias for clusterpix operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for clusterpix operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Energy range with `max <= min` or a non-finite bound.
    #[error("invalid energy range: min {min}, max {max} (max must be greater than min)")]
    InvalidEnergyRange { min: f64, max: f64 },

    /// Image with a zero dimension.
    #[error("invalid image size: {width}x{height}")]
    InvalidImageSize { width: usize, height: usize },

    /// Empty cluster error.
    #[error("cannot compute centroid of empty cluster")]
    EmptyCluster,
}
