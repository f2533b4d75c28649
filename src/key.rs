//! Key material shared by the provisioning, verification and sealing paths.

use core::cmp;
use core::fmt;
use zeroize::Zeroize;

/// The length in bytes of every key used by the protocol.
pub const KEY_LEN: usize = 16;

/// A per-tag AES-128 master key.
///
/// Created at provisioning time from operator input and owned exclusively by
/// the key ceremony for the duration of a key change. Persisting it is the
/// job of the host's secure storage; this type only guarantees that the
/// bytes are wiped on drop and never reach `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct MasterKey([u8; KEY_LEN]);

impl MasterKey {
    /// The well-known all-zero key of a factory-fresh tag.
    pub const DEFAULT: MasterKey = MasterKey([0; KEY_LEN]);

    /// Creates a key from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> MasterKey {
        MasterKey(bytes)
    }

    /// Creates a key from operator input.
    ///
    /// The UTF-8 bytes of the passphrase are truncated to 16 bytes or padded
    /// with zeros up to 16 bytes. An empty passphrase therefore yields
    /// [`MasterKey::DEFAULT`].
    pub fn from_passphrase(passphrase: &str) -> MasterKey {
        let input = passphrase.as_bytes();
        let n = cmp::min(input.len(), KEY_LEN);

        let mut bytes = [0; KEY_LEN];
        bytes[..n].copy_from_slice(&input[..n]);

        MasterKey(bytes)
    }

    /// Returns the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Whether this is the factory default key.
    pub fn is_default(&self) -> bool {
        *self == MasterKey::DEFAULT
    }
}

impl Drop for MasterKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MasterKey([REDACTED])")
    }
}

/// A derived AES-128 session key.
///
/// Valid for exactly one verification under one counter value. Must be
/// rederived for every scan and never persisted, which is why this type has
/// no constructors besides the derivation in [`crate::sun`] and no
/// serialization support.
pub struct SessionKey([u8; KEY_LEN]);

impl SessionKey {
    pub(crate) fn new(bytes: [u8; KEY_LEN]) -> SessionKey {
        SessionKey(bytes)
    }

    /// Returns the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Drop for SessionKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SessionKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passphrase_padding() {
        let key = MasterKey::from_passphrase("hunter2");
        let mut expected = [0; KEY_LEN];
        expected[..7].copy_from_slice(b"hunter2");
        assert_eq!(&expected, key.as_bytes());
    }

    #[test]
    fn passphrase_truncation() {
        let key = MasterKey::from_passphrase("0123456789ABCDEF-and-then-some");
        assert_eq!(b"0123456789ABCDEF", key.as_bytes());
    }

    #[test]
    fn passphrase_exact() {
        let key = MasterKey::from_passphrase("exactly16bytes!!");
        assert_eq!(b"exactly16bytes!!", key.as_bytes());
    }

    #[test]
    fn empty_passphrase_is_default() {
        assert!(MasterKey::from_passphrase("").is_default());
        assert_eq!(&[0; KEY_LEN], MasterKey::DEFAULT.as_bytes());
    }

    #[test]
    fn debug_redacts() {
        let key = MasterKey::from_passphrase("hunter2");
        assert_eq!("MasterKey([REDACTED])", format!("{:?}", key));
        let session = SessionKey::new(*key.as_bytes());
        assert_eq!("SessionKey([REDACTED])", format!("{:?}", session));
    }
}
