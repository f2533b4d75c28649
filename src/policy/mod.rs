//! File access policies and their settings encoding.
//!
//! A tag file carries four access rights, a communication mode and
//! optionally the mirror configuration that makes scan URLs dynamic. Hosts
//! describe all of that with the types here, usually deserialized from a
//! configuration file, and [`AccessPolicy::encode`] turns the description
//! into the settings bytes the tag expects. The encoder refuses policies
//! that would lock their own change right away, since a tag configured
//! that way can never be reconfigured.

mod error;

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::transport::TagTransport;

pub use error::Error;

/// The result type for the `policy` module.
pub type Result<T> = core::result::Result<T, Error>;

/// The file number of the NDEF file, the usual target for mirror policies.
pub const NDEF_FILE_NO: u8 = 2;

/// The highest key slot the tag family offers.
const KEY_SLOT_MAX: u8 = 13;

/// The largest offset that fits the 3-byte offset fields.
const OFFSET_MAX: u32 = 0x00FF_FFFF;

// Bits of the file option byte.
const OPTION_SDM: u8 = 0x40;

// Bits of the mirror options byte.
const MIRROR_UID: u8 = 0x80;
const MIRROR_COUNTER: u8 = 0x40;
const MIRROR_ASCII: u8 = 0x01;

/// Who may perform a file operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AccessCondition {
    /// Anyone, without authentication.
    Free,
    /// Nobody, not even a key holder.
    Never,
    /// Holders of the key in this slot.
    Key(u8),
}

impl AccessCondition {
    /// The right's nibble in the settings encoding.
    fn nibble(&self) -> Result<u8> {
        match self {
            AccessCondition::Free => Ok(0xE),
            AccessCondition::Never => Ok(0xF),
            AccessCondition::Key(slot) if *slot <= KEY_SLOT_MAX => Ok(*slot),
            AccessCondition::Key(slot) => Err(Error::KeySlotOutOfRange(*slot)),
        }
    }
}

/// How commands against the file travel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CommMode {
    /// In the clear.
    Plain,
    /// In the clear, with a MAC over each command.
    Mac,
    /// Encrypted and MACed.
    Full,
}

impl CommMode {
    fn bits(&self) -> u8 {
        match self {
            CommMode::Plain => 0x00,
            CommMode::Mac => 0x01,
            CommMode::Full => 0x03,
        }
    }
}

/// The mirror configuration that makes a file's scan URLs dynamic.
///
/// Offsets locate the mirrors inside the file. A mirror without an offset
/// is simply off, so "offset without mirror" is not expressible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SdmPolicy {
    /// Offset of the UID mirror, when the UID is mirrored.
    pub uid_offset: Option<u32>,
    /// Offset of the counter mirror, when the counter is mirrored.
    pub counter_offset: Option<u32>,
    /// Who may read the mirrored tag metadata.
    pub meta_read: AccessCondition,
    /// Who holds the master key the per-scan codes are derived from.
    /// `Never` turns the code mirror off.
    pub file_read: AccessCondition,
    /// Who may fetch the counter over an authenticated channel.
    pub counter_retrieval: AccessCondition,
    /// Offset where the authenticated region begins.
    pub mac_input_offset: u32,
    /// Offset of the code mirror.
    pub mac_offset: u32,
}

impl SdmPolicy {
    fn encode_into(&self, settings: &mut Vec<u8>) -> Result<()> {
        let mut options = MIRROR_ASCII;
        if self.uid_offset.is_some() {
            options |= MIRROR_UID;
        }
        if self.counter_offset.is_some() {
            options |= MIRROR_COUNTER;
        }
        settings.push(options);

        settings.push(self.meta_read.nibble()? << 4 | self.file_read.nibble()?);
        settings.push(0xF0 | self.counter_retrieval.nibble()?);

        if let Some(offset) = self.uid_offset {
            push_offset(settings, offset)?;
        }
        if let Some(offset) = self.counter_offset {
            push_offset(settings, offset)?;
        }
        if self.file_read != AccessCondition::Never {
            push_offset(settings, self.mac_input_offset)?;
            push_offset(settings, self.mac_offset)?;
        }

        Ok(())
    }
}

/// A file's access policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccessPolicy {
    /// How commands against the file travel.
    pub comm_mode: CommMode,
    /// Who may read the file.
    pub read: AccessCondition,
    /// Who may write the file.
    pub write: AccessCondition,
    /// Who may both read and write the file.
    pub read_write: AccessCondition,
    /// Who may change these settings later.
    pub change: AccessCondition,
    /// The mirror configuration, or `None` for a static file.
    pub sdm: Option<SdmPolicy>,
}

impl AccessPolicy {
    /// Encodes the policy into the settings bytes the tag expects.
    ///
    /// The layout is the file option byte, two access rights bytes, and,
    /// only when mirroring is on, the mirror options byte, two mirror
    /// access bytes and a 3-byte little-endian offset per enabled mirror.
    pub fn encode(&self) -> Result<Vec<u8>> {
        // Refused before any encoding: a policy nobody can change again is
        // almost always a provisioning accident.
        if self.change == AccessCondition::Never {
            return Err(Error::IrreversiblePolicy);
        }

        let mut settings = Vec::new();

        let mut file_option = self.comm_mode.bits();
        if self.sdm.is_some() {
            file_option |= OPTION_SDM;
        }
        settings.push(file_option);

        settings.push(self.read.nibble()? << 4 | self.write.nibble()?);
        settings.push(self.read_write.nibble()? << 4 | self.change.nibble()?);

        if let Some(sdm) = &self.sdm {
            sdm.encode_into(&mut settings)?;
        }

        Ok(settings)
    }
}

/// Encodes a policy and writes it to a file on the tag.
///
/// # Arguments
/// * `tag` - The transport holding the tag.
/// * `file_no` - The file to reconfigure.
/// * `policy` - The policy to apply.
pub fn apply<T: TagTransport>(mut tag: T, file_no: u8, policy: &AccessPolicy) -> Result<()> {
    let settings = policy.encode()?;
    tag.change_file_settings(file_no, &settings)?;

    Ok(())
}

fn push_offset(settings: &mut Vec<u8>, offset: u32) -> Result<()> {
    if offset > OFFSET_MAX {
        return Err(Error::OffsetTooLarge(offset));
    }
    settings.extend_from_slice(&offset.to_le_bytes()[..3]);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::MasterKey;
    use crate::transport::{AuthOutcome, TransportError};

    /// The usual scan-URL policy: everyone may read, key 0 administers,
    /// UID and counter mirrored, codes derived from key 2.
    fn mirror_policy() -> AccessPolicy {
        AccessPolicy {
            comm_mode: CommMode::Plain,
            read: AccessCondition::Free,
            write: AccessCondition::Key(0),
            read_write: AccessCondition::Key(0),
            change: AccessCondition::Key(0),
            sdm: Some(SdmPolicy {
                uid_offset: Some(0x20),
                counter_offset: Some(0x43),
                meta_read: AccessCondition::Free,
                file_read: AccessCondition::Key(2),
                counter_retrieval: AccessCondition::Free,
                mac_input_offset: 0x51,
                mac_offset: 0x51,
            }),
        }
    }

    #[test]
    fn static_file_is_three_bytes() {
        let policy = AccessPolicy {
            comm_mode: CommMode::Plain,
            read: AccessCondition::Free,
            write: AccessCondition::Key(1),
            read_write: AccessCondition::Key(1),
            change: AccessCondition::Key(0),
            sdm: None,
        };

        assert_eq!(vec![0x00, 0xE1, 0x10], policy.encode().unwrap());
    }

    #[test]
    fn comm_mode_bits() {
        let mut policy = AccessPolicy {
            comm_mode: CommMode::Mac,
            read: AccessCondition::Free,
            write: AccessCondition::Free,
            read_write: AccessCondition::Free,
            change: AccessCondition::Free,
            sdm: None,
        };
        assert_eq!(0x01, policy.encode().unwrap()[0]);

        policy.comm_mode = CommMode::Full;
        assert_eq!(0x03, policy.encode().unwrap()[0]);
    }

    #[test]
    fn mirror_policy_bytes() {
        assert_eq!(
            vec![
                0x40, // SDM on, plain communication
                0xE0, 0x00, // access rights
                0xC1, // UID and counter mirrors, ASCII
                0xE2, 0xFE, // mirror access rights
                0x20, 0x00, 0x00, // UID offset
                0x43, 0x00, 0x00, // counter offset
                0x51, 0x00, 0x00, // MAC input offset
                0x51, 0x00, 0x00, // MAC offset
            ],
            mirror_policy().encode().unwrap()
        );
    }

    #[test]
    fn counter_only_mirror_drops_uid_offset() {
        let mut policy = mirror_policy();
        let sdm = policy.sdm.as_mut().unwrap();
        sdm.uid_offset = None;
        sdm.file_read = AccessCondition::Never;

        assert_eq!(
            vec![
                0x40,
                0xE0, 0x00,
                0x41, // counter mirror only
                0xEF, 0xFE,
                0x43, 0x00, 0x00,
                // No MAC offsets with the code mirror off.
            ],
            policy.encode().unwrap()
        );
    }

    #[test]
    fn irreversible_policy_is_refused() {
        let mut policy = mirror_policy();
        policy.change = AccessCondition::Never;

        assert_eq!(Err(Error::IrreversiblePolicy), policy.encode());
    }

    #[test]
    fn key_slots_stop_at_13() {
        let mut policy = mirror_policy();
        policy.write = AccessCondition::Key(13);
        assert_eq!(0xED, policy.encode().unwrap()[1]);

        policy.write = AccessCondition::Key(14);
        assert_eq!(Err(Error::KeySlotOutOfRange(14)), policy.encode());
    }

    #[test]
    fn offsets_stop_at_24_bits() {
        let mut policy = mirror_policy();
        policy.sdm.as_mut().unwrap().counter_offset = Some(0x0100_0000);

        assert_eq!(Err(Error::OffsetTooLarge(0x0100_0000)), policy.encode());
    }

    /// Captures what a policy application writes.
    struct FakeTag {
        written: Option<(u8, Vec<u8>)>,
    }

    impl TagTransport for FakeTag {
        fn authenticate(
            &mut self,
            _key_no: u8,
            _key: &MasterKey,
        ) -> crate::transport::Result<AuthOutcome> {
            Ok(AuthOutcome::Accepted)
        }

        fn change_key(
            &mut self,
            _key_no: u8,
            _old_key: &MasterKey,
            _new_key: &MasterKey,
            _key_version: u8,
        ) -> crate::transport::Result<()> {
            Ok(())
        }

        fn change_file_settings(
            &mut self,
            file_no: u8,
            settings: &[u8],
        ) -> crate::transport::Result<()> {
            self.written = Some((file_no, settings.to_vec()));
            Ok(())
        }
    }

    #[test]
    fn apply_writes_the_encoding() {
        let mut tag = FakeTag { written: None };
        let policy = mirror_policy();

        apply(&mut tag, NDEF_FILE_NO, &policy).unwrap();

        let (file_no, settings) = tag.written.unwrap();
        assert_eq!(NDEF_FILE_NO, file_no);
        assert_eq!(policy.encode().unwrap(), settings);
    }

    #[test]
    fn apply_stops_on_a_bad_policy() {
        let mut tag = FakeTag { written: None };
        let mut policy = mirror_policy();
        policy.change = AccessCondition::Never;

        assert_eq!(
            Err(Error::IrreversiblePolicy),
            apply(&mut tag, NDEF_FILE_NO, &policy)
        );
        assert!(tag.written.is_none());
    }

    #[test]
    fn transport_failure_propagates() {
        struct DeadTag;
        impl TagTransport for DeadTag {
            fn authenticate(
                &mut self,
                _key_no: u8,
                _key: &MasterKey,
            ) -> crate::transport::Result<AuthOutcome> {
                Err(TransportError::Link)
            }

            fn change_key(
                &mut self,
                _key_no: u8,
                _old_key: &MasterKey,
                _new_key: &MasterKey,
                _key_version: u8,
            ) -> crate::transport::Result<()> {
                Err(TransportError::Link)
            }

            fn change_file_settings(
                &mut self,
                _file_no: u8,
                _settings: &[u8],
            ) -> crate::transport::Result<()> {
                Err(TransportError::Link)
            }
        }

        assert_eq!(
            Err(Error::Transport(TransportError::Link)),
            apply(DeadTag, NDEF_FILE_NO, &mirror_policy())
        );
    }

    #[test]
    fn policy_survives_serde() {
        let json = r#"{
            "comm_mode": "Plain",
            "read": "Free",
            "write": { "Key": 0 },
            "read_write": { "Key": 0 },
            "change": { "Key": 0 },
            "sdm": {
                "uid_offset": 32,
                "counter_offset": 67,
                "meta_read": "Free",
                "file_read": { "Key": 2 },
                "counter_retrieval": "Free",
                "mac_input_offset": 81,
                "mac_offset": 81
            }
        }"#;

        let policy: AccessPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(mirror_policy(), policy);
        assert_eq!(
            policy,
            serde_json::from_str::<AccessPolicy>(&serde_json::to_string(&policy).unwrap()).unwrap()
        );
    }
}
