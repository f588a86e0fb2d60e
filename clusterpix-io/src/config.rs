//! JSON run configuration.
//!
//! A run scans the energy range once, then images each dataset with that
//! range. Relative paths in a config file resolve against the file's own
//! directory.

use crate::processor::{FileProcessor, ProcessingSummary};
use crate::scanner::EnergyRangeScanner;
use crate::{Error, Result};
use clusterpix_clist::DEFAULT_PIXEL_COLUMN;
use clusterpix_core::{EnergyRange, ImageSize};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_column() -> String {
    DEFAULT_PIXEL_COLUMN.to_string()
}

/// Explicit energy bounds, bypassing the range scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnergyRangeConfig {
    /// Energy mapped to `0.0`.
    pub min: f64,
    /// Energy mapped to `1.0`; must exceed `min`.
    pub max: f64,
}

/// One input file and where its images go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetConfig {
    /// Input clist file.
    pub input: PathBuf,
    /// Output directory for `image_{index}.npy` files.
    pub output: PathBuf,
    /// Process only the first `max_rows` rows.
    #[serde(default)]
    pub max_rows: Option<usize>,
}

/// A complete batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Output image size (default 256x256).
    #[serde(default)]
    pub image_size: ImageSize,
    /// Files scanned for the global energy range.
    #[serde(default)]
    pub range_files: Vec<PathBuf>,
    /// Fixed energy range. Takes precedence over `range_files`.
    #[serde(default)]
    pub energy_range: Option<EnergyRangeConfig>,
    /// Header name of the pixel column.
    #[serde(default = "default_column")]
    pub column: String,
    /// Datasets to image, in order.
    pub datasets: Vec<DatasetConfig>,
}

/// Result of [`RunConfig::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Range used for every dataset.
    pub range: EnergyRange,
    /// One entry per dataset, in config order.
    pub datasets: Vec<ProcessingSummary>,
}

impl RunConfig {
    /// Parses a config from JSON text without resolving paths.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or the config is invalid.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file and resolves its relative paths.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is malformed, or is invalid.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(Error::at_path(path))?;
        let mut config = Self::from_json_str(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Checks that there is something to do and a way to get a range.
    ///
    /// # Errors
    /// Returns [`Error::Config`] or a core error describing the problem.
    pub fn validate(&self) -> Result<()> {
        self.image_size.validate()?;
        if self.datasets.is_empty() {
            return Err(Error::Config("no datasets configured".to_string()));
        }
        match self.energy_range {
            Some(r) => {
                EnergyRange::new(r.min, r.max)?;
            }
            None if self.range_files.is_empty() => {
                return Err(Error::Config(
                    "either range_files or energy_range is required".to_string(),
                ));
            }
            None => {}
        }
        if self.column.is_empty() {
            return Err(Error::Config("column name is empty".to_string()));
        }
        Ok(())
    }

    /// Rewrites relative paths as `base.join(path)`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        self.range_files.iter_mut().for_each(resolve);
        for dataset in &mut self.datasets {
            resolve(&mut dataset.input);
            resolve(&mut dataset.output);
        }
    }

    /// The configured range, or the scanned range of `range_files`.
    ///
    /// # Errors
    /// Returns an error if the explicit range is invalid or the scan fails.
    pub fn energy_range(&self) -> Result<EnergyRange> {
        if let Some(r) = self.energy_range {
            return Ok(EnergyRange::new(r.min, r.max)?);
        }
        let scan = EnergyRangeScanner::new()
            .with_column(self.column.clone())
            .scan(self.range_files.as_slice())?;
        Ok(scan.range)
    }

    /// Determines the energy range once and images every dataset with it.
    ///
    /// # Errors
    /// Stops at the first failing scan or dataset.
    pub fn run(&self) -> Result<RunSummary> {
        self.validate()?;
        let range = self.energy_range()?;
        let mut datasets = Vec::with_capacity(self.datasets.len());

        for dataset in &self.datasets {
            let processor = FileProcessor::new(self.image_size)
                .with_max_rows(dataset.max_rows)
                .with_column(self.column.clone());
            datasets.push(processor.process_file(&dataset.input, &dataset.output, range)?);
        }
        Ok(RunSummary { range, datasets })
    }
}
