//! Per-file imaging pipeline.
//!
//! Each row goes through parse, normalize, center and rasterize, and the
//! image is handed to an [`ImageSink`] before the next row is read. Any row
//! failure aborts the whole file; images already written stay on disk.

use crate::reader::ClistFileReader;
use crate::writer::{ImageSink, NpyDirectorySink};
use crate::{Error, Result};
use clusterpix_clist::DEFAULT_PIXEL_COLUMN;
use clusterpix_core::{cluster_to_image, EnergyRange, ImageSize};
use std::path::{Path, PathBuf};

const PROGRESS_INTERVAL: usize = 1000;

/// Counters for one processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingSummary {
    /// Input file.
    pub input: PathBuf,
    /// Rows imaged (and images written).
    pub rows: usize,
    /// Hits across all imaged rows.
    pub hits: usize,
}

/// Converts the rows of a clist file into images.
#[derive(Debug, Clone)]
pub struct FileProcessor {
    image_size: ImageSize,
    max_rows: Option<usize>,
    column: String,
}

impl FileProcessor {
    /// Creates a processor producing `image_size` images from every row.
    #[must_use]
    pub fn new(image_size: ImageSize) -> Self {
        Self {
            image_size,
            max_rows: None,
            column: DEFAULT_PIXEL_COLUMN.to_string(),
        }
    }

    /// Only process the first `max_rows` rows (all rows if `None`).
    #[must_use]
    pub fn with_max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Sets the pixel column name.
    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Image size used for every row.
    #[must_use]
    pub fn image_size(&self) -> ImageSize {
        self.image_size
    }

    /// Row cap, if any.
    #[must_use]
    pub fn max_rows(&self) -> Option<usize> {
        self.max_rows
    }

    /// Images every row of `input` into `sink`, keyed by zero-based row index.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, a row fails to parse or
    /// center, or the sink fails. Processing stops at the first error.
    pub fn process_into<P, S>(
        &self,
        input: P,
        range: EnergyRange,
        sink: &mut S,
    ) -> Result<ProcessingSummary>
    where
        P: AsRef<Path>,
        S: ImageSink + ?Sized,
    {
        let input = input.as_ref();
        self.image_size.validate()?;
        let reader = ClistFileReader::open(input)?;
        let limit = self.max_rows.unwrap_or(usize::MAX);
        log::debug!(
            "processing {} ({} bytes), image {}x{}, row cap {:?}",
            input.display(),
            reader.file_size(),
            self.image_size.width,
            self.image_size.height,
            self.max_rows
        );

        let mut summary = ProcessingSummary {
            input: input.to_path_buf(),
            rows: 0,
            hits: 0,
        };

        for row in reader.rows(&self.column)?.take(limit) {
            let row = row?;
            let index = row.index;
            let image = row
                .cluster()
                .map_err(Error::from)
                .and_then(|cluster| {
                    summary.hits += cluster.len();
                    Ok(cluster_to_image(cluster, range, self.image_size)?)
                })
                .map_err(|e| e.in_row(input, index, row.line))?;

            sink.write_image(index, &image)
                .map_err(|e| e.in_row(input, index, row.line))?;
            summary.rows += 1;

            if summary.rows % PROGRESS_INTERVAL == 0 {
                log::debug!("{}: {} rows", input.display(), summary.rows);
            }
        }

        log::info!(
            "{}: imaged {} rows ({} hits)",
            input.display(),
            summary.rows,
            summary.hits
        );
        Ok(summary)
    }

    /// Images `input` into `image_{index}.npy` files under `output_dir`.
    ///
    /// The directory is created if absent and existing artifacts with the
    /// same index are overwritten.
    ///
    /// # Errors
    /// See [`FileProcessor::process_into`]; also fails if `output_dir` cannot
    /// be created.
    pub fn process_file<P, Q>(
        &self,
        input: P,
        output_dir: Q,
        range: EnergyRange,
    ) -> Result<ProcessingSummary>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let mut sink = NpyDirectorySink::create(output_dir)?;
        self.process_into(input, range, &mut sink)
    }
}

/// Images `input` into `output_dir` with the default pixel column.
///
/// # Errors
/// See [`FileProcessor::process_file`].
pub fn process_file<P, Q>(
    input: P,
    output_dir: Q,
    range: EnergyRange,
    image_size: ImageSize,
    max_rows: Option<usize>,
) -> Result<ProcessingSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    FileProcessor::new(image_size)
        .with_max_rows(max_rows)
        .process_file(input, output_dir, range)
}
