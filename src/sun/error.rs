//! The errors of the `sun` module.

use core::fmt;
#[cfg(feature = "std")]
use std::error;

/// The error type for scan wire values.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// A wire value had the wrong number of hex characters.
    InvalidLength {
        /// The number of characters the value must have.
        expected: usize,
        /// The number of characters it had.
        actual: usize,
    },
    /// A wire value contained a character outside the hex alphabet.
    InvalidHex,
    /// A counter value does not fit the tag's 24-bit scan counter.
    /// Contains the offending value.
    CounterOutOfRange(u32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidLength { expected, actual } => write!(
                f,
                "Expected {} hex characters, got {}",
                expected, actual
            ),
            Error::InvalidHex => write!(f, "Encountered a non-hex character in a wire value"),
            Error::CounterOutOfRange(value) => {
                write!(f, "Counter {} exceeds the 24-bit range", value)
            }
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for Error {}
