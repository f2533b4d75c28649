//! The errors of the `crypto` module.

use core::fmt;
#[cfg(feature = "std")]
use std::error;

/// The error type for the block primitive.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// Input to a block operation was not exactly one cipher block wide.
    /// Contains the offending length.
    InvalidBlockSize(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidBlockSize(len) => write!(
                f,
                "Input must be exactly one 16-byte block, got {} bytes",
                len
            ),
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for Error {}
