//! Hit type for cluster pixel data.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single pixel reading within a cluster.
///
/// Coordinates are signed so that centering shifts can move a hit past the
/// image origin before it is clamped back into bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hit {
    /// X coordinate (column).
    pub x: i64,
    /// Y coordinate (row).
    pub y: i64,
    /// Deposited energy. Raw detector units before normalization.
    pub energy: f64,
}

impl Hit {
    /// Creates a new hit.
    #[inline]
    #[must_use]
    pub fn new(x: i64, y: i64, energy: f64) -> Self {
        Self { x, y, energy }
    }

    /// Returns true if the hit lies in `[0, width) x [0, height)`.
    #[inline]
    #[must_use]
    pub fn in_bounds(&self, width: usize, height: usize) -> bool {
        usize::try_from(self.x).is_ok_and(|x| x < width)
            && usize::try_from(self.y).is_ok_and(|y| y < height)
    }
}
