//! The errors of the `token` module.

use core::fmt;
#[cfg(feature = "std")]
use std::error;

/// The error type for checksum lookups.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// No checksum is stored under the presented prefix. Distinct from a
    /// failed verification: the prefix does not identify anything at all.
    NotFound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotFound => write!(f, "No checksum is stored under the presented prefix"),
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for Error {}
