//! Scan verification for tags in secure mirror mode.
//!
//! A tag in this mode writes three values into every scan URL: its UID, a
//! counter the hardware increments on each read, and an 8-byte code over
//! the two. The code is a truncated CMAC under a session key derived from
//! the tag's master key, the UID and the counter, so each press of the
//! counter produces a value that cannot be forged or reused. This module
//! parses the wire values, reproduces the code server-side and tracks the
//! counter to refuse replays.

mod error;
mod message;
#[cfg(test)]
mod test_vectors;
mod verify;

pub use error::Error;
pub use message::{ScanCounter, ScanMessage, SdmCode, Uid, CODE_LEN, UID_LEN};
pub use verify::{compute_code, derive_session_key, ScanOutcome, SunVerifier};

/// The result type for the `sun` module.
pub type Result<T> = core::result::Result<T, Error>;
