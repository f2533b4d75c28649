//! The channel seam between the key lifecycle and a physical tag.
//!
//! The crate computes what to send and interprets what comes back, but it
//! never owns an NFC reader. Hosts implement [`TagTransport`] over whatever
//! channel they have (PC/SC, an embedded frontend, a test double) and the
//! lifecycle and policy modules drive it. Implementations are expected to
//! serialize access per physical tag; the ceremony types assume the tag they
//! hold is not being driven concurrently.

use core::fmt;
#[cfg(feature = "std")]
use std::error;

use crate::key::MasterKey;

/// The verdict of an authentication attempt.
///
/// Key rejection is an expected outcome during provisioning, when candidate
/// keys are probed, so it is a value here and not an error.
#[derive(Debug, PartialEq)]
pub enum AuthOutcome {
    /// The tag accepted the key and the session is established.
    Accepted,
    /// The tag rejected the key.
    Rejected,
}

/// An operator-side view of a tag behind some channel.
///
/// All methods take `&mut self` since every command advances the tag's
/// session state.
pub trait TagTransport {
    /// Runs mutual authentication against a key slot.
    ///
    /// Returns `Rejected` when the tag refuses the key; transport errors are
    /// reserved for command or channel failures.
    ///
    /// # Arguments
    /// * `key_no` - The key slot on the tag.
    /// * `key` - The key to authenticate with.
    fn authenticate(&mut self, key_no: u8, key: &MasterKey) -> Result<AuthOutcome>;

    /// Replaces the key in a slot, authorized by the old key.
    ///
    /// # Arguments
    /// * `key_no` - The key slot on the tag.
    /// * `old_key` - The key currently in the slot.
    /// * `new_key` - The replacement.
    /// * `key_version` - The version byte stored alongside the new key.
    fn change_key(
        &mut self,
        key_no: u8,
        old_key: &MasterKey,
        new_key: &MasterKey,
        key_version: u8,
    ) -> Result<()>;

    /// Writes encoded file settings to a file on the tag.
    ///
    /// # Arguments
    /// * `file_no` - The file number on the tag.
    /// * `settings` - The encoded settings block.
    fn change_file_settings(&mut self, file_no: u8, settings: &[u8]) -> Result<()>;
}

// Lets ceremonies take either the transport itself or a borrow of it.
impl<T: TagTransport + ?Sized> TagTransport for &mut T {
    fn authenticate(&mut self, key_no: u8, key: &MasterKey) -> Result<AuthOutcome> {
        (**self).authenticate(key_no, key)
    }

    fn change_key(
        &mut self,
        key_no: u8,
        old_key: &MasterKey,
        new_key: &MasterKey,
        key_version: u8,
    ) -> Result<()> {
        (**self).change_key(key_no, old_key, new_key, key_version)
    }

    fn change_file_settings(&mut self, file_no: u8, settings: &[u8]) -> Result<()> {
        (**self).change_file_settings(file_no, settings)
    }
}

/// The result type for transport operations.
pub type Result<T> = core::result::Result<T, TransportError>;

/// The error type for transport operations.
#[derive(Debug, PartialEq)]
pub enum TransportError {
    /// The tag answered a command with an error status word.
    Command {
        /// The two status bytes from the response trailer.
        status: (u8, u8),
    },
    /// The channel to the tag was lost, e.g. the tag left the field.
    Link,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransportError::Command { status } => write!(
                f,
                "Tag returned error status {:02X}{:02X}",
                status.0, status.1
            ),
            TransportError::Link => write!(f, "Lost the channel to the tag"),
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for TransportError {}
