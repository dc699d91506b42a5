// src/error.rs

//! Errors for _utmplib_.
//!
//! A [`DecodeError`] is raised by the pure record decoder and knows nothing
//! about where the record came from. The [`UtmpReader`] wraps it into a
//! [`UtmpError::Decode`] with the file path and 1-based record position.
//!
//! [`UtmpReader`]: crate::readers::utmpreader::UtmpReader

use crate::common::{Count, FPath, FileOffset};

use ::thiserror::Error;

/// A single record block could not be decoded.
///
/// A block must be exactly [`UTMP_SZ`] bytes.
///
/// [`UTMP_SZ`]: crate::data::utmp::UTMP_SZ
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum DecodeError {
    #[error("record block is {0} bytes, not the size of one record")]
    BlockSize(usize),
    #[error("ut_type value {0} is not a known record type")]
    UnknownType(i16),
    #[error("tv_sec value {0} is not a representable datetime")]
    Timestamp(i32),
}

/// An error of _utmplib_.
///
/// The message names where the error happened; the cause is only
/// available from [`source`](std::error::Error::source).
#[derive(Debug, Error)]
pub enum UtmpError {
    #[error("file not found {0:?}")]
    SourceNotFound(FPath),
    #[error("{path:?}")]
    Io {
        path: FPath,
        #[source]
        source: std::io::Error,
    },
    #[error("{path:?}: record {position} at offset {fileoffset}")]
    Decode {
        path: FPath,
        position: Count,
        fileoffset: FileOffset,
        #[source]
        source: DecodeError,
    },
    #[error("{path:?}: trailing partial record of {len} bytes at offset {fileoffset}")]
    Truncated {
        path: FPath,
        fileoffset: FileOffset,
        len: usize,
    },
    #[error("{0}: Not supported the format")]
    UnsupportedFormat(String),
    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),
    #[error("YAML serialization failed")]
    Yaml(#[from] serde_yaml::Error),
}

impl UtmpError {
    /// Helper for mapping an I/O failure on `path`.
    pub fn io(path: &str, source: std::io::Error) -> UtmpError {
        UtmpError::Io {
            path: FPath::from(path),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, UtmpError>;
