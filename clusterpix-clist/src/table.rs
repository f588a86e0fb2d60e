//! Tab-separated clist table reader.
//!
//! The first non-blank line is the header. Only the cluster-pixel column is
//! extracted; every other column is ignored. Quoting follows the usual
//! delimited-text rules, so a quoted field may itself contain tabs.

use crate::error::{Error, Result};
use crate::parser::parse_cluster_pixels;
use clusterpix_core::Cluster;
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};

/// Header name of the cluster-pixel column written by the clustering toolchain.
pub const DEFAULT_PIXEL_COLUMN: &str = "ClusterPixels";

/// A data row of a clist table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClistRow {
    /// Zero-based index among data rows (header and blank lines excluded).
    pub index: usize,
    /// One-based line number in the file.
    pub line: usize,
    /// Raw cluster-pixel field, surrounding whitespace removed.
    pub pixels: String,
}

impl ClistRow {
    /// Parses the pixel field of this row.
    ///
    /// # Errors
    /// Returns [`Error::Parse`] if the field is malformed.
    pub fn cluster(&self) -> Result<Cluster> {
        Ok(parse_cluster_pixels(&self.pixels)?)
    }
}

/// Iterator over the data rows of a clist table held in memory.
pub struct ClistRows<'a> {
    records: StringRecordsIntoIter<&'a [u8]>,
    column: usize,
    next_index: usize,
    failed: bool,
}

impl<'a> ClistRows<'a> {
    /// Reads the header of `text` and locates `column_name`.
    ///
    /// # Errors
    /// See [`ClistRows::from_bytes`].
    pub fn new(text: &'a str, column_name: &str) -> Result<Self> {
        Self::from_bytes(text.as_bytes(), column_name)
    }

    /// Reads the header of a UTF-8 table and locates `column_name`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFormat`] if there is no header line or it is
    /// not valid text, or [`Error::MissingColumn`] if the header does not
    /// contain `column_name`.
    pub fn from_bytes(data: &'a [u8], column_name: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .from_reader(data);

        let header = reader.headers().map_err(|e| csv_error(&e))?;
        if is_blank(header) {
            return Err(Error::InvalidFormat("missing header line".to_string()));
        }
        let column = header
            .iter()
            .position(|name| name.trim() == column_name)
            .ok_or_else(|| Error::MissingColumn(column_name.to_string()))?;
        log::debug!("pixel column '{column_name}' found at position {column}");

        Ok(Self {
            records: reader.into_records(),
            column,
            next_index: 0,
            failed: false,
        })
    }

    /// Column position of the pixel field.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }
}

impl Iterator for ClistRows<'_> {
    type Item = Result<ClistRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let record = loop {
            match self.records.next()? {
                Ok(record) if is_blank(&record) => {}
                Ok(record) => break record,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(csv_error(&e)));
                }
            }
        };
        let line = record
            .position()
            .map_or(0, |pos| usize::try_from(pos.line()).unwrap_or(usize::MAX));

        let Some(field) = record.get(self.column) else {
            self.failed = true;
            return Some(Err(Error::InvalidFormat(format!(
                "line {line}: expected at least {} tab-separated fields",
                self.column + 1
            ))));
        };

        let row = ClistRow {
            index: self.next_index,
            line,
            pixels: field.trim().to_string(),
        };
        self.next_index += 1;
        Some(Ok(row))
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

fn csv_error(err: &csv::Error) -> Error {
    match err.position() {
        Some(pos) => Error::InvalidFormat(format!("line {}: {err}", pos.line())),
        None => Error::InvalidFormat(err.to_string()),
    }
}
