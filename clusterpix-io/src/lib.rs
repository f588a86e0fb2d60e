//! clusterpix-io: clist input, energy range scanning and NPY image output.
//!
//! This crate drives the imaging pipeline over files: clist inputs are
//! memory-mapped via memmap2, a global energy range is scanned once, and each
//! row is imaged into its own `image_{index}.npy` artifact.
//!

mod error;
pub mod config;
pub mod npy;
pub mod processor;
mod reader;
pub mod scanner;
mod writer;

pub use config::{DatasetConfig, EnergyRangeConfig, RunConfig, RunSummary};
pub use error::{Error, Result};
pub use npy::{load_npy, read_npy, save_npy, write_npy};
pub use processor::{process_file, FileProcessor, ProcessingSummary};
pub use reader::{ClistFileReader, MappedFileReader};
pub use scanner::{compute_energy_range, EnergyRangeScanner, EnergyScan};
pub use writer::{artifact_name, ImageSink, NpyDirectorySink};
