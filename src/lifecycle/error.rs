//! The errors of the `lifecycle` module.

use core::fmt;
#[cfg(feature = "std")]
use std::error;

use crate::transport::TransportError;

/// The error type for key ceremonies.
///
/// Display texts name the ceremony step that failed and never include key
/// material.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// The tag rejected every key the ceremony was allowed to offer, so its
    /// current key is unknown and nothing was changed.
    AuthenticationDenied,
    /// The tag accepted the key change but then refused to authenticate
    /// with the new key, so the slot is in doubt.
    VerificationFailed,
    /// The channel failed mid-ceremony.
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
            Error::AuthenticationDenied => {
                write!(f, "The tag rejected the offered keys during authentication")
            }
            Error::VerificationFailed => write!(
                f,
                "The tag accepted the key change but rejected the new key during confirmation"
            ),
            Error::Transport(e) => write!(f, "Transport failed during the ceremony: {}", e),
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
