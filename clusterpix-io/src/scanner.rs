//! Global energy range scanner.
//!
//! Walks every row of one or more clist files and tracks the smallest and
//! largest raw hit energy. The resulting [`EnergyRange`] is then handed to
//! the file processor by value. The scanned files need not be the ones that
//! are later imaged.

use crate::reader::ClistFileReader;
use crate::{Error, Result};
use clusterpix_clist::DEFAULT_PIXEL_COLUMN;
use clusterpix_core::{EnergyBounds, EnergyRange};
use std::path::Path;

/// Outcome of an energy range scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyScan {
    /// Normalization range derived from the observed energies.
    pub range: EnergyRange,
    /// Files scanned.
    pub files: usize,
    /// Data rows scanned.
    pub rows: usize,
    /// Hits scanned.
    pub hits: usize,
}

/// Scanner for the global energy range of a clist dataset.
#[derive(Debug, Clone)]
pub struct EnergyRangeScanner {
    column: String,
}

impl Default for EnergyRangeScanner {
    fn default() -> Self {
        Self {
            column: DEFAULT_PIXEL_COLUMN.to_string(),
        }
    }
}

impl EnergyRangeScanner {
    /// Creates a scanner reading the default `ClusterPixels` column.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pixel column name.
    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Folds every hit of one file into `bounds`.
    ///
    /// Returns the number of rows scanned.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or any row fails to parse.
    pub fn scan_file<P: AsRef<Path>>(&self, path: P, bounds: &mut EnergyBounds) -> Result<usize> {
        let path = path.as_ref();
        let reader = ClistFileReader::open(path)?;
        let mut rows = 0;

        for row in reader.rows(&self.column)? {
            let row = row?;
            let cluster = row
                .cluster()
                .map_err(|e| Error::from(e).in_row(path, row.index, row.line))?;
            bounds.update(&cluster);
            rows += 1;
        }

        log::debug!("scanned {} rows from {}", rows, path.display());
        Ok(rows)
    }

    /// Scans all `files` and derives the global energy range.
    ///
    /// # Errors
    /// Returns an error if any file cannot be read or parsed, if no hits were
    /// found, or if every hit has the same energy.
    pub fn scan<P: AsRef<Path>>(&self, files: &[P]) -> Result<EnergyScan> {
        let mut bounds = EnergyBounds::new();
        let mut rows = 0;
        for path in files {
            rows += self.scan_file(path, &mut bounds)?;
        }

        let range = bounds.range().ok_or(Error::EmptyDataset(files.len()))??;
        log::info!(
            "energy range over {} file(s), {} rows, {} hits: [{}, {}]",
            files.len(),
            rows,
            bounds.hit_count(),
            range.min(),
            range.max()
        );

        Ok(EnergyScan {
            range,
            files: files.len(),
            rows,
            hits: bounds.hit_count(),
        })
    }
}

/// Computes the global energy range of `files` using the default column.
///
/// # Errors
/// See [`EnergyRangeScanner::scan`].
pub fn compute_energy_range<P: AsRef<Path>>(files: &[P]) -> Result<EnergyRange> {
    Ok(EnergyRangeScanner::new().scan(files)?.range)
}
