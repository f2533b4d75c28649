//! The errors of the `policy` module.

use core::fmt;
#[cfg(feature = "std")]
use std::error;

use crate::transport::TransportError;

/// The error type for policy encoding and application.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// The policy sets its own change right to `Never`, which would weld
    /// the file settings in place for the life of the tag.
    IrreversiblePolicy,
    /// A key slot beyond the ones the tag family offers. Contains the
    /// offending slot.
    KeySlotOutOfRange(u8),
    /// A mirror offset that does not fit the 3-byte offset field. Contains
    /// the offending offset.
    OffsetTooLarge(u32),
    /// The tag refused the settings write.
    Transport(TransportError),
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Error {
        Error::Transport(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IrreversiblePolicy => write!(
                f,
                "The policy sets its change right to Never and could never be undone"
            ),
            Error::KeySlotOutOfRange(slot) => {
                write!(f, "Key slot {} does not exist on this tag family", slot)
            }
            Error::OffsetTooLarge(offset) => {
                write!(f, "Offset {} does not fit the 3-byte offset field", offset)
            }
            Error::Transport(e) => write!(f, "Transport failed while applying the policy: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Transport(e) => Some(e),
            _ => None,
        }
    }
}
