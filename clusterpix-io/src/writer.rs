//! Destinations for rasterized cluster images.

use crate::npy::save_npy;
use crate::{Error, Result};
use clusterpix_core::Image;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the artifact for row `index`.
#[must_use]
pub fn artifact_name(index: usize) -> String {
    format!("image_{index}.npy")
}

/// Receives one image per processed row, keyed by zero-based row index.
pub trait ImageSink {
    /// Persists the image for row `index`, replacing any earlier one.
    ///
    /// # Errors
    /// Returns an error if the image cannot be stored.
    fn write_image(&mut self, index: usize, image: &Image) -> Result<()>;
}

/// Writes each image as `image_{index}.npy` inside a directory.
#[derive(Debug)]
pub struct NpyDirectorySink {
    dir: PathBuf,
    written: usize,
}

impl NpyDirectorySink {
    /// Creates the output directory (and parents) if absent.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn create<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(Error::at_path(dir))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            written: 0,
        })
    }

    /// Output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the artifact for row `index`.
    #[must_use]
    pub fn artifact_path(&self, index: usize) -> PathBuf {
        self.dir.join(artifact_name(index))
    }

    /// Number of images written through this sink.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }
}

impl ImageSink for NpyDirectorySink {
    fn write_image(&mut self, index: usize, image: &Image) -> Result<()> {
        save_npy(self.artifact_path(index), image)?;
        self.written += 1;
        Ok(())
    }
}

/// In-memory sink, mostly useful for tests and notebooks.
impl ImageSink for BTreeMap<usize, Image> {
    fn write_image(&mut self, index: usize, image: &Image) -> Result<()> {
        self.insert(index, image.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::npy::load_npy;
    use tempfile::tempdir;

    #[test]
    fn test_artifact_name() {
        assert_eq!(artifact_name(0), "image_0.npy");
        assert_eq!(artifact_name(2499), "image_2499.npy");
    }

    #[test]
    fn test_directory_sink_creates_nested_dir() {
        let tmp = tempdir().unwrap();
        let out = tmp.path().join("a").join("b");
        let mut sink = NpyDirectorySink::create(&out).unwrap();
        assert!(out.is_dir());

        let mut image = Image::zeros((3, 3));
        image[[1, 1]] = 0.25;
        sink.write_image(7, &image).unwrap();

        assert_eq!(sink.written(), 1);
        assert_eq!(load_npy(out.join("image_7.npy")).unwrap(), image);
    }

    #[test]
    fn test_directory_sink_overwrites() {
        let tmp = tempdir().unwrap();
        let mut sink = NpyDirectorySink::create(tmp.path()).unwrap();

        sink.write_image(0, &Image::zeros((2, 2))).unwrap();
        let ones = Image::ones((2, 2));
        sink.write_image(0, &ones).unwrap();

        assert_eq!(load_npy(sink.artifact_path(0)).unwrap(), ones);
    }

    #[test]
    fn test_directory_sink_fails_on_file_path() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("not_a_dir");
        fs::write(&file, b"x").unwrap();
        assert!(NpyDirectorySink::create(&file).is_err());
    }
}
