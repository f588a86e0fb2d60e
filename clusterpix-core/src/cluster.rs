//! Structure of Arrays (`SoA`) storage for the hits of one cluster.
//!
//! Pipeline stages (normalization, centering) rewrite a single column in
//! place, so hits are kept in parallel vectors rather than a `Vec<Hit>`.

use crate::hit::Hit;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The ordered hits recorded for one particle-interaction event.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cluster {
    /// Columnar storage for X coordinates.
    pub x: Vec<i64>,
    /// Columnar storage for Y coordinates.
    pub y: Vec<i64>,
    /// Columnar storage for energies.
    pub energy: Vec<f64>,
}

impl Cluster {
    /// Creates a new empty cluster with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            energy: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of hits in the cluster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns true if the cluster has no hits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Pushes a single hit.
    pub fn push(&mut self, x: i64, y: i64, energy: f64) {
        self.x.push(x);
        self.y.push(y);
        self.energy.push(energy);
    }

    /// Returns the hit at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Hit> {
        Some(Hit::new(
            *self.x.get(index)?,
            *self.y.get(index)?,
            *self.energy.get(index)?,
        ))
    }

    /// Iterates over hits in input order.
    pub fn iter(&self) -> impl Iterator<Item = Hit> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.energy)
            .map(|((&x, &y), &energy)| Hit::new(x, y, energy))
    }

    /// Returns `(min, max)` energy, or `None` for an empty cluster.
    #[must_use]
    pub fn energy_bounds(&self) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        Some(self.energy.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), &e| (min.min(e), max.max(e)),
        ))
    }
}

impl FromIterator<Hit> for Cluster {
    fn from_iter<I: IntoIterator<Item = Hit>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut cluster = Self::with_capacity(iter.size_hint().0);
        for hit in iter {
            cluster.push(hit.x, hit.y, hit.energy);
        }
        cluster
    }
}

impl Extend<Hit> for Cluster {
    fn extend<I: IntoIterator<Item = Hit>>(&mut self, iter: I) {
        for hit in iter {
            self.push(hit.x, hit.y, hit.energy);
        }
    }
}
