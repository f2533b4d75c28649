//! Session key derivation, code computation and replay tracking.

use crate::crypto::Cmac;
use crate::key::{MasterKey, SessionKey};

use super::message::{ScanCounter, ScanMessage, SdmCode, Uid, CODE_LEN};

/// The fixed label opening the session derivation input. It marks the
/// derivation as producing a MAC session key, as opposed to the encryption
/// session key the tag family also knows.
const SV2_LABEL: [u8; 6] = [0x3C, 0xC3, 0x00, 0x01, 0x00, 0x80];

/// Derives the session key for one scan.
///
/// The derivation input is the 16-byte vector `label || UID || counter`,
/// with the counter in little-endian, authenticated under the master key
/// with CMAC. Every counter value yields a fresh key, so a derived key is
/// only ever good for the single scan it was derived for.
///
/// # Arguments
/// * `key` - The tag's scan-authentication master key.
/// * `uid` - The tag's UID.
/// * `counter` - The counter value mirrored in this scan.
pub fn derive_session_key(key: &MasterKey, uid: &Uid, counter: ScanCounter) -> SessionKey {
    let mut sv2 = [0; 16];
    sv2[..6].copy_from_slice(&SV2_LABEL);
    sv2[6..13].copy_from_slice(uid.as_bytes());
    sv2[13..].copy_from_slice(&counter.to_le_bytes());

    SessionKey::new(Cmac::new(key.as_bytes()).authenticate(&sv2))
}

/// Computes the truncated code a genuine tag mirrors for one session.
///
/// The full CMAC under the session key is cut down to its bytes at odd
/// indices. With the mirror-only file layout nothing precedes the code in
/// the authenticated region, so `mac_input` is empty there; configurations
/// that do authenticate file content pass it here.
///
/// # Arguments
/// * `session_key` - The key derived for this scan.
/// * `mac_input` - The authenticated region of the file, if any.
pub fn compute_code(session_key: &SessionKey, mac_input: &[u8]) -> SdmCode {
    let full = Cmac::new(session_key.as_bytes()).authenticate(mac_input);

    let mut code = [0; CODE_LEN];
    for (i, byte) in code.iter_mut().enumerate() {
        *byte = full[2 * i + 1];
    }

    SdmCode::new(code)
}

/// The possible verdicts on one scan.
#[derive(Debug, PartialEq)]
pub enum ScanOutcome {
    /// The code matches and the counter advanced past everything seen.
    Authentic,
    /// The code does not match this tag, counter and key.
    CodeMismatch,
    /// The code matches but the counter did not advance, so the URL is a
    /// re-presentation of an earlier scan.
    Replayed {
        /// The counter value the scan carried.
        received: u32,
        /// The highest counter value accepted so far.
        highest: u32,
    },
}

/// Scan verification with replay tracking for one physical tag.
///
/// Holds the tag's master key and the highest counter accepted so far.
/// Hosts that persist tag state across restarts seed the window with
/// [`SunVerifier::with_floor`] and read it back through
/// [`SunVerifier::highest_counter`].
pub struct SunVerifier {
    key: MasterKey,
    highest: Option<ScanCounter>,
}

impl SunVerifier {
    /// Creates a verifier that has not yet accepted any scan.
    ///
    /// # Arguments
    /// * `key` - The tag's scan-authentication master key.
    pub fn new(key: MasterKey) -> SunVerifier {
        SunVerifier { key, highest: None }
    }

    /// Creates a verifier resuming from a persisted counter. Scans at or
    /// below the floor count as replays.
    ///
    /// # Arguments
    /// * `key` - The tag's scan-authentication master key.
    /// * `floor` - The highest counter accepted in earlier runs.
    pub fn with_floor(key: MasterKey, floor: ScanCounter) -> SunVerifier {
        SunVerifier {
            key,
            highest: Some(floor),
        }
    }

    /// Returns the highest counter accepted so far.
    pub fn highest_counter(&self) -> Option<ScanCounter> {
        self.highest
    }

    /// Checks one scan and advances the replay window when it is authentic.
    ///
    /// The code is recomputed from scratch for the presented counter. Only
    /// a matching code can advance the window, and a mismatch leaves the
    /// window where it was.
    ///
    /// # Arguments
    /// * `message` - The UID and counter the scan carried.
    /// * `code` - The code the scan carried.
    pub fn verify(&mut self, message: &ScanMessage, code: &SdmCode) -> ScanOutcome {
        let session_key = derive_session_key(&self.key, &message.uid, message.counter);
        if compute_code(&session_key, &[]) != *code {
            return ScanOutcome::CodeMismatch;
        }

        match self.highest {
            Some(highest) if message.counter <= highest => ScanOutcome::Replayed {
                received: message.counter.value(),
                highest: highest.value(),
            },
            _ => {
                self.highest = Some(message.counter);
                ScanOutcome::Authentic
            }
        }
    }
}
