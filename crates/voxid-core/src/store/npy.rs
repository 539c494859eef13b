//! Minimal NumPy `.npy` codec for 1-D float arrays.
//!
//! Layout (all multi-byte integers little-endian):
//!
//! ```text
//! [6B magic "\x93NUMPY"] [1B major] [1B minor]
//! [2B header_len (v1) | 4B header_len (v2, v3)]
//! [header_len B python dict literal, space padded, '\n' terminated]
//! [data]
//! ```
//!
//! Files written here are version 1.0 with dtype `<f4` and shape `(D,)`,
//! which is what `numpy.save` produces for a squeezed float32 embedding.

use thiserror::Error;

const MAGIC: &[u8; 6] = b"\x93NUMPY";
const ALIGNMENT: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NpyError {
    #[error("not an npy file (bad magic)")]
    BadMagic,

    #[error("unsupported npy version {0}.{1}")]
    UnsupportedVersion(u8, u8),

    #[error("truncated file")]
    Truncated,

    #[error("malformed header: {0}")]
    Header(String),

    #[error("unsupported dtype {0}")]
    UnsupportedDtype(String),

    #[error("fortran-ordered arrays are not supported")]
    FortranOrder,

    #[error("unsupported shape {0:?}: expected a single vector")]
    UnsupportedShape(Vec<usize>),

    #[error("data length {actual} does not match shape ({expected} bytes)")]
    DataLength { expected: usize, actual: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dtype {
    F32,
    F64,
}

impl Dtype {
    fn parse(descr: &str) -> Result<Self, NpyError> {
        match descr {
            "<f4" => Ok(Self::F32),
            "<f8" => Ok(Self::F64),
            other => Err(NpyError::UnsupportedDtype(other.to_string())),
        }
    }

    const fn width(self) -> usize {
        match self {
            Self::F32 => 4,
            Self::F64 => 8,
        }
    }
}

/// Serialize a vector as a version 1.0 `.npy` file body.
pub fn encode(vector: &[f32]) -> Vec<u8> {
    let dict = format!(
        "{{'descr': '<f4', 'fortran_order': False, 'shape': ({},), }}",
        vector.len()
    );
    // magic + version + u16 length
    let prefix = MAGIC.len() + 2 + 2;
    let unpadded = prefix + dict.len() + 1;
    let padding = (ALIGNMENT - unpadded % ALIGNMENT) % ALIGNMENT;
    let header_len = dict.len() + padding + 1;

    let mut out = Vec::with_capacity(prefix + header_len + vector.len() * 4);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&[1, 0]);
    out.extend_from_slice(&(header_len as u16).to_le_bytes());
    out.extend_from_slice(dict.as_bytes());
    out.resize(out.len() + padding, b' ');
    out.push(b'\n');
    for &v in vector {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

/// Parse a `.npy` file holding one float vector.
///
/// Accepts versions 1.0, 2.0 and 3.0, dtypes `<f4` and `<f8`, and shapes
/// `(D,)` or `(1, D)`. `<f8` data is narrowed to `f32`.
pub fn decode(bytes: &[u8]) -> Result<Vec<f32>, NpyError> {
    if bytes.len() < MAGIC.len() + 2 || &bytes[..MAGIC.len()] != MAGIC {
        return Err(NpyError::BadMagic);
    }
    let (major, minor) = (bytes[6], bytes[7]);
    let (header_start, header_len): (usize, usize) = match major {
        1 => {
            let raw = bytes.get(8..10).ok_or(NpyError::Truncated)?;
            (10, usize::from(u16::from_le_bytes([raw[0], raw[1]])))
        }
        2 | 3 => {
            let raw = bytes.get(8..12).ok_or(NpyError::Truncated)?;
            let len = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
            (12, len as usize)
        }
        _ => return Err(NpyError::UnsupportedVersion(major, minor)),
    };

    let header_end = header_start
        .checked_add(header_len)
        .ok_or(NpyError::Truncated)?;
    let header = bytes
        .get(header_start..header_end)
        .ok_or(NpyError::Truncated)?;
    let header = std::str::from_utf8(header)
        .map_err(|_| NpyError::Header("header is not UTF-8".to_string()))?;

    let dtype = Dtype::parse(&quoted_value(header, "descr")?)?;
    if bare_value(header, "fortran_order")? == "True" {
        return Err(NpyError::FortranOrder);
    }
    let shape = parse_shape(header)?;
    let len = match shape.as_slice() {
        [n] | [1, n] => *n,
        _ => return Err(NpyError::UnsupportedShape(shape)),
    };

    let data = &bytes[header_end..];
    let expected = len
        .checked_mul(dtype.width())
        .ok_or_else(|| NpyError::Header(format!("shape ({len},) is too large")))?;
    if data.len() != expected {
        return Err(NpyError::DataLength {
            expected,
            actual: data.len(),
        });
    }

    let vector = match dtype {
        Dtype::F32 => data
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
        Dtype::F64 => data
            .chunks_exact(8)
            .map(|c| {
                f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]) as f32
            })
            .collect(),
    };
    Ok(vector)
}

/// Text following `'key':` in the header dict, trimmed.
fn value_after<'a>(header: &'a str, key: &str) -> Result<&'a str, NpyError> {
    let needle = format!("'{key}':");
    let start = header
        .find(&needle)
        .ok_or_else(|| NpyError::Header(format!("missing key {key}")))?;
    Ok(header[start + needle.len()..].trim_start())
}

fn quoted_value(header: &str, key: &str) -> Result<String, NpyError> {
    let rest = value_after(header, key)?;
    let quote = rest
        .chars()
        .next()
        .filter(|c| *c == '\'' || *c == '"')
        .ok_or_else(|| NpyError::Header(format!("{key} is not a string")))?;
    let body = &rest[1..];
    let end = body
        .find(quote)
        .ok_or_else(|| NpyError::Header(format!("unterminated {key}")))?;
    Ok(body[..end].to_string())
}

fn bare_value<'a>(header: &'a str, key: &str) -> Result<&'a str, NpyError> {
    let rest = value_after(header, key)?;
    let end = rest.find([',', '}']).unwrap_or(rest.len());
    Ok(rest[..end].trim())
}

fn parse_shape(header: &str) -> Result<Vec<usize>, NpyError> {
    let rest = value_after(header, "shape")?;
    let inner = rest
        .strip_prefix('(')
        .and_then(|r| r.find(')').map(|end| &r[..end]))
        .ok_or_else(|| NpyError::Header("shape is not a tuple".to_string()))?;

    inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| NpyError::Header(format!("bad shape dimension {s:?}")))
        })
        .collect()
}
