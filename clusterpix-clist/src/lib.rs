//! clusterpix-clist: cluster-pixel tokenizer and clist table reader.
//!
//! This crate reads the tab-separated cluster lists produced by the detector
//! clustering toolchain and turns each row's pixel field into a
//! [`clusterpix_core::Cluster`].
//!
//! # Key Components
//!
//! - [`PixelRecords`] - Tokenizer over `[x,y,E,t][x,y,E,t]...` strings
//! - [`ClistRows`] - Row iterator over an in-memory clist table
//!
//! The tokenizer is a strict grammar: a malformed group is reported as a
//! [`ParseError`] with its byte offset, never skipped.

mod error;
pub mod parser;
pub mod table;

pub use error::{Error, ParseError, ParseErrorKind, Result};
pub use parser::{
    format_cluster_pixels, parse_cluster_pixels, parse_pixel_records, PixelRecord, PixelRecords,
};
pub use table::{ClistRow, ClistRows, DEFAULT_PIXEL_COLUMN};
