//! Error types and result handling
//!
//! This module provides error types used throughout the library:
//! - [`Error`] - The main error type
//! - [`Result`] - Type alias for `Result<T, Error>`
//!
//! Detection and encoding operations return [`Result`] to indicate success
//! or failure. No operation retries internally; errors are surfaced to the
//! caller by value.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No barcode geometry was found: the image is too small for the
    /// search area, no guard pattern matched, or an edge point is missing.
    NotFound,
    /// No supported character set can encode the input character at the
    /// given position.
    Unencodable(usize),
    /// The encoded bit stream exceeds the capacity of the largest version
    /// at the requested error correction level.
    DataTooBig,
    /// A contract was violated inside the library.
    Internal(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "no barcode found"),
            Self::Unencodable(position) => {
                write!(f, "cannot encode character at position {position}")
            }
            Self::DataTooBig => write!(f, "data too big for any version"),
            Self::Internal(reason) => write!(f, "internal library error: {reason}"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T, E = Error> = std::result::Result<T, E>;
