//! Memory-mapped file readers.
//!

use crate::{Error, Result};
use clusterpix_clist::ClistRows;
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A memory-mapped file reader.
///
/// Uses memmap2 to access file contents without copying the whole
/// file into a heap buffer. The mapping is released when the reader drops.
pub struct MappedFileReader {
    mmap: Mmap,
    path: PathBuf,
}

impl MappedFileReader {
    /// Opens a file for memory-mapped reading.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or memory-mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(Error::at_path(path))?;
        // SAFETY: The file is opened read-only and we assume it is not modified concurrently.
        // This is the standard safety contract for memory mapping.
        #[allow(unsafe_code)]
        let mmap = unsafe { Mmap::map(&file).map_err(Error::at_path(path))? };
        Ok(Self {
            mmap,
            path: path.to_path_buf(),
        })
    }

    /// Returns the file contents as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap[..]
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Returns true if the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Path the reader was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A tab-separated clist file.
pub struct ClistFileReader {
    reader: MappedFileReader,
}

impl ClistFileReader {
    /// Opens a clist file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or memory-mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            reader: MappedFileReader::open(path)?,
        })
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn file_size(&self) -> usize {
        self.reader.len()
    }

    /// Path the file was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.reader.path()
    }

    /// File contents as text.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFormat`] if the file is not valid UTF-8.
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(self.reader.as_bytes()).map_err(|e| {
            Error::InvalidFormat(format!(
                "{} is not valid UTF-8: {e}",
                self.reader.path().display()
            ))
        })
    }

    /// Iterates over data rows, extracting the `column` pixel field.
    ///
    /// # Errors
    /// Returns [`Error::File`] wrapping the clist error if the file has no
    /// header or the header lacks `column`.
    pub fn rows(&self, column: &str) -> Result<ClistRows<'_>> {
        ClistRows::from_bytes(self.reader.as_bytes(), column)
            .map_err(|e| Error::from(e).in_file(self.path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clusterpix_clist::DEFAULT_PIXEL_COLUMN;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_mapped_file_reader() {
        let mut file = NamedTempFile::new().unwrap();
        let data: Vec<u8> = (0..64).collect();
        file.write_all(&data).unwrap();
        file.flush().unwrap();

        let reader = MappedFileReader::open(file.path()).unwrap();
        assert_eq!(reader.len(), 64);
        assert!(!reader.is_empty());
        assert_eq!(reader.as_bytes(), &data[..]);
        assert_eq!(reader.path(), file.path());
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = MappedFileReader::open("/nonexistent/clusters.clist")
            .err()
            .unwrap();
        assert!(err.to_string().contains("/nonexistent/clusters.clist"));
    }

    #[test]
    fn test_clist_file_rows() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "id\tClusterPixels\n0\t[1,2,3,4]\n1\t[5,6,7,8][9,9,9,9]\n").unwrap();
        file.flush().unwrap();

        let reader = ClistFileReader::open(file.path()).unwrap();
        let sizes: Vec<usize> = reader
            .rows(DEFAULT_PIXEL_COLUMN)
            .unwrap()
            .map(|row| row.unwrap().cluster().unwrap().len())
            .collect();
        assert_eq!(sizes, vec![1, 2]);
    }

    #[test]
    fn test_clist_file_missing_column() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "id\tPixels").unwrap();
        file.flush().unwrap();

        let reader = ClistFileReader::open(file.path()).unwrap();
        let err = reader.rows(DEFAULT_PIXEL_COLUMN).err().unwrap();
        match err {
            Error::File { path, source } => {
                assert_eq!(path, file.path());
                assert!(matches!(
                    *source,
                    Error::Clist(clusterpix_clist::Error::MissingColumn(ref name))
                        if name == DEFAULT_PIXEL_COLUMN
                ));
            }
            other => panic!("expected file error, got {other:?}"),
        }
    }

    #[test]
    fn test_clist_file_quoted_tab() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Note\tClusterPixels\n\"a\tb\"\t[1,1,1,0]\n").unwrap();
        file.flush().unwrap();

        let reader = ClistFileReader::open(file.path()).unwrap();
        let row = reader.rows(DEFAULT_PIXEL_COLUMN).unwrap().next().unwrap().unwrap();
        assert_eq!(row.pixels, "[1,1,1,0]");
    }

    #[test]
    fn test_clist_file_not_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, b'\n']).unwrap();
        file.flush().unwrap();

        let reader = ClistFileReader::open(file.path()).unwrap();
        assert!(matches!(reader.text(), Err(Error::InvalidFormat(_))));
    }
}
