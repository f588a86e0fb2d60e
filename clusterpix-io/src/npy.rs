//! NPY array encoding for cluster images.
//!
//! Images are stored as NPY version 1.0, little-endian `float64`, C order,
//! two dimensions `(width, height)`. The preamble (magic, version, header
//! length and header dict) is padded to a multiple of 64 bytes.

use crate::{Error, Result};
use clusterpix_core::Image;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

const MAGIC: &[u8; 6] = b"\x93NUMPY";
const ALIGNMENT: usize = 64;
/// Magic (6) + version (2) + header length (2).
const PREAMBLE_LEN: usize = 10;
/// Upper bound on values preallocated from an untrusted shape.
const MAX_PREALLOC: usize = 1 << 20;

fn header_dict(shape: (usize, usize)) -> String {
    format!(
        "{{'descr': '<f8', 'fortran_order': False, 'shape': ({}, {}), }}",
        shape.0, shape.1
    )
}

/// Encodes `image` as NPY into `writer`.
///
/// # Errors
/// Returns an error if writing fails or the header does not fit the
/// version 1.0 length field.
pub fn write_npy<W: Write>(mut writer: W, image: &Image) -> Result<()> {
    let mut header = header_dict(image.dim());
    let unpadded = PREAMBLE_LEN + header.len() + 1;
    let padding = (ALIGNMENT - unpadded % ALIGNMENT) % ALIGNMENT;
    header.push_str(&" ".repeat(padding));
    header.push('\n');

    let header_len = u16::try_from(header.len())
        .map_err(|_| Error::InvalidFormat(format!("NPY header too long: {}", header.len())))?;

    writer.write_all(MAGIC)?;
    writer.write_all(&[1, 0])?;
    writer.write_all(&header_len.to_le_bytes())?;
    writer.write_all(header.as_bytes())?;
    for value in image {
        writer.write_all(&value.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `image` to `path`, replacing any existing file.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn save_npy<P: AsRef<Path>>(path: P, image: &Image) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(Error::at_path(path))?;
    write_npy(BufWriter::new(file), image)
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::InvalidFormat(format!("NPY: {}", msg.into()))
}

/// Extracts the value of `'key': ` from a header dict, up to `terminator`.
fn dict_value<'a>(dict: &'a str, key: &str, terminator: char) -> Option<&'a str> {
    let needle = format!("'{key}':");
    let start = dict.find(&needle)? + needle.len();
    let rest = dict[start..].trim_start();
    let end = rest.find(terminator)?;
    Some(rest[..end].trim())
}

fn parse_shape(dict: &str) -> Result<(usize, usize)> {
    let shape = dict_value(dict, "shape", ')')
        .and_then(|s| s.strip_prefix('('))
        .ok_or_else(|| invalid("missing shape"))?;
    let dims = shape
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::parse::<usize>)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| invalid(format!("bad shape '{shape}': {e}")))?;
    match dims[..] {
        [width, height] => Ok((width, height)),
        _ => Err(invalid(format!("expected 2 dimensions, found {}", dims.len()))),
    }
}

/// Decodes a 2D little-endian `float64` C-order NPY array from `reader`.
///
/// # Errors
/// Returns [`Error::InvalidFormat`] for any other dtype, layout or rank, or
/// if the data is truncated.
pub fn read_npy<R: Read>(mut reader: R) -> Result<Image> {
    let mut magic = [0u8; 6];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(invalid("bad magic"));
    }

    let mut version = [0u8; 2];
    reader.read_exact(&mut version)?;
    let header_len = match version[0] {
        1 => {
            let mut len = [0u8; 2];
            reader.read_exact(&mut len)?;
            usize::from(u16::from_le_bytes(len))
        }
        2 | 3 => {
            let mut len = [0u8; 4];
            reader.read_exact(&mut len)?;
            usize::try_from(u32::from_le_bytes(len)).map_err(|_| invalid("header too long"))?
        }
        major => return Err(invalid(format!("unsupported version {major}.{}", version[1]))),
    };

    let mut header = vec![0u8; header_len];
    reader.read_exact(&mut header)?;
    let dict = std::str::from_utf8(&header).map_err(|_| invalid("header is not UTF-8"))?;

    let descr = dict_value(dict, "descr", ',').ok_or_else(|| invalid("missing descr"))?;
    if descr != "'<f8'" {
        return Err(invalid(format!("unsupported dtype {descr}")));
    }
    let fortran = dict_value(dict, "fortran_order", ',')
        .ok_or_else(|| invalid("missing fortran_order"))?;
    if fortran != "False" {
        return Err(invalid("Fortran-ordered arrays are not supported"));
    }
    let shape = parse_shape(dict)?;

    let count = shape
        .0
        .checked_mul(shape.1)
        .filter(|n| n.checked_mul(8).is_some())
        .ok_or_else(|| invalid(format!("shape {shape:?} overflows")))?;
    let mut data = Vec::with_capacity(count.min(MAX_PREALLOC));
    let mut buf = [0u8; 8];
    for _ in 0..count {
        reader
            .read_exact(&mut buf)
            .map_err(|e| invalid(format!("truncated data: {e}")))?;
        data.push(f64::from_le_bytes(buf));
    }

    Image::from_shape_vec(shape, data).map_err(|e| invalid(e.to_string()))
}

/// Reads an image from `path`.
///
/// # Errors
/// Returns an error if the file cannot be opened or is not a supported NPY array.
pub fn load_npy<P: AsRef<Path>>(path: P) -> Result<Image> {
    let path = path.as_ref();
    let file = File::open(path).map_err(Error::at_path(path))?;
    read_npy(BufReader::new(file))
}
