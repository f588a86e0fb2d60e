//! Image frame dimensions.

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Output image dimensions, constant for a run.
///
/// Images are indexed `[[x, y]]`, so `width` is the length of the first axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct ImageSize {
    /// Number of columns (x extent).
    pub width: usize,
    /// Number of rows (y extent).
    pub height: usize,
}

impl Default for ImageSize {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
        }
    }
}

impl ImageSize {
    /// Creates a new image size.
    ///
    /// # Errors
    /// Returns [`Error::InvalidImageSize`] if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    /// Creates a square image size.
    ///
    /// # Errors
    /// Returns [`Error::InvalidImageSize`] if `side` is zero.
    pub fn square(side: usize) -> Result<Self> {
        Self::new(side, side)
    }

    /// Checks that both dimensions are non-zero.
    ///
    /// # Errors
    /// Returns [`Error::InvalidImageSize`] if either dimension is zero.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidImageSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Integer midpoint `(width / 2, height / 2)`.
    #[inline]
    #[must_use]
    pub fn center(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }

    /// Array shape `(width, height)`.
    #[inline]
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Total number of cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Returns true if the frame has no cells.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
