//! Defines [`GeoWkxError`], representing all errors returned by this crate.

use std::fmt::Debug;

use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GeoWkxError {
    /// Unexpected token or character while decoding WKT.
    #[error("Malformed WKT at position {position}: {message} (near \"{context}\")")]
    MalformedWkt {
        /// Character offset into the input where decoding failed
        position: usize,
        /// What the decoder expected
        message: String,
        /// The offending slice of input
        context: String,
    },

    /// A word in the WKT input is not a keyword of the dialect
    #[error("Unrecognized keyword \"{keyword}\" at position {position}")]
    UnrecognizedKeyword {
        /// The word as it appeared in the input
        keyword: String,
        /// Character offset of the word
        position: usize,
    },

    /// Buffer underflow, invalid type code or other structural WKB error
    #[error("Malformed WKB: {0}")]
    MalformedWkb(String),

    /// The dialect has no representation for this geometry type
    #[error("Unsupported geometry type for dialect: {0}")]
    UnsupportedGeometryType(String),

    /// A caller-supplied CRS disagrees with the SRID or dimension of the input
    #[error("CRS mismatch: {0}")]
    CrsMismatch(String),

    /// A value does not fit the field it is written to
    #[error("Value out of range: {0}")]
    ValueOutOfRange(String),

    /// [std::io::Error]
    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, GeoWkxError>;

impl GeoWkxError {
    /// Build a [`GeoWkxError::MalformedWkt`] pointing at `position` in `input`.
    pub(crate) fn malformed_wkt(input: &str, position: usize, message: impl Into<String>) -> Self {
        let context = match input.get(position..) {
            Some("") | None => "<end of input>".to_string(),
            Some(rest) => rest.chars().take(20).collect(),
        };
        GeoWkxError::MalformedWkt {
            position,
            message: message.into(),
            context,
        }
    }
}
