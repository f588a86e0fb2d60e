//! Global energy range and per-hit energy normalization.

use crate::cluster::Cluster;
use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Global `(min, max)` energy bounds used to rescale hit energies.
///
/// Always satisfies `max > min` with both bounds finite, so normalizing with
/// a constructed range can never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EnergyRange {
    min: f64,
    max: f64,
}

impl EnergyRange {
    /// Creates a new energy range.
    ///
    /// # Errors
    /// Returns [`Error::InvalidEnergyRange`] if either bound is not finite or
    /// `max <= min`.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(Error::InvalidEnergyRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Lower bound.
    #[inline]
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    #[inline]
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Width of the range, always positive.
    #[inline]
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Maps `energy` linearly so that `min -> 0.0` and `max -> 1.0`.
    ///
    /// Energies outside the range map outside `[0, 1]`; they are not clipped.
    #[inline]
    #[must_use]
    pub fn normalize(&self, energy: f64) -> f64 {
        (energy - self.min) / self.span()
    }
}

/// Rescales every hit energy of `cluster` into the unit range of `range`.
///
/// Coordinates are left untouched.
pub fn normalize_energy(cluster: &mut Cluster, range: EnergyRange) {
    for energy in &mut cluster.energy {
        *energy = range.normalize(*energy);
    }
}

/// Running minimum and maximum over any number of clusters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBounds {
    min: f64,
    max: f64,
    hits: usize,
}

impl Default for EnergyBounds {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            hits: 0,
        }
    }
}

impl EnergyBounds {
    /// Creates empty bounds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds the energies of `cluster` into the bounds.
    pub fn update(&mut self, cluster: &Cluster) {
        if let Some((min, max)) = cluster.energy_bounds() {
            self.min = self.min.min(min);
            self.max = self.max.max(max);
            self.hits += cluster.len();
        }
    }

    /// Number of hits folded in so far.
    #[must_use]
    pub fn hit_count(&self) -> usize {
        self.hits
    }

    /// Returns `(min, max)` if at least one hit has been seen.
    #[must_use]
    pub fn bounds(&self) -> Option<(f64, f64)> {
        (self.hits > 0).then_some((self.min, self.max))
    }

    /// Converts the observed bounds into a normalization range.
    ///
    /// Returns `None` if no hits were seen.
    ///
    /// # Errors
    /// Returns [`Error::InvalidEnergyRange`] if every observed energy was equal.
    pub fn range(&self) -> Option<Result<EnergyRange>> {
        self.bounds().map(|(min, max)| EnergyRange::new(min, max))
    }
}
