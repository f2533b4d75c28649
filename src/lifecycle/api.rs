//! The ceremony states and the one-call drivers.

use super::{Error, Result};
use crate::key::MasterKey;
use crate::transport::{AuthOutcome, TagTransport};

/// The key slot holding the application master key on this tag family.
pub const APP_MASTER_KEY_NO: u8 = 0;

/// The key version byte written alongside a changed key.
const KEY_VERSION: u8 = 0;

/// How the ceremony found the key it was authorized by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyOrigin {
    /// The tag still carried the factory default key.
    Factory,
    /// The tag already carried the candidate key and it was written again.
    Reasserted,
    /// A known current key was replaced by the next one.
    Rotated,
}

/// Where a tag stands after a ceremony.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TagState {
    /// No ceremony has run against the tag yet.
    Unprovisioned,
    /// The tag carries the new key, but the factory default still opened
    /// the slot in the final probe. The tag works, but it is not hardened.
    Provisioned,
    /// The tag carries the new key and the factory default is locked out.
    Verified,
}

/// The outcome of a completed ceremony.
#[derive(Debug, PartialEq)]
pub struct ProvisionReport {
    /// Where the tag stands now.
    pub state: TagState,
    /// How the ceremony was authorized.
    pub origin: KeyOrigin,
}

/// The structure providing all operations of the key ceremony.
///
/// A ceremony moves through its states by consuming itself, so steps can
/// neither be skipped nor repeated against the same tag session.
pub struct Ceremony<S: CeremonyState>(pub S);

// Marker trait tying the states to the ceremony.
pub trait CeremonyState {}
impl<T: TagTransport> CeremonyState for Probing<T> {}
impl<T: TagTransport> CeremonyState for Changing<T> {}
impl<T: TagTransport> CeremonyState for Confirming<T> {}

/// Contains the state to find a key the tag accepts.
pub struct Probing<T> {
    tag: T,
    key_no: u8,
}

impl<T: TagTransport> Ceremony<Probing<T>> {
    /// Creates a ceremony against one tag.
    ///
    /// # Arguments
    /// * `tag` - The transport holding the tag.
    /// * `key_no` - The key slot to take ownership of.
    pub fn new(tag: T, key_no: u8) -> Ceremony<Probing<T>> {
        Ceremony(Probing { tag, key_no })
    }

    /// Finds a key the tag accepts, in at most two guesses: first the
    /// factory default, then the candidate itself.
    ///
    /// A tag that accepts the default is factory fresh; one that accepts
    /// the candidate was already provisioned with it and gets the key
    /// written again. A tag that rejects both is under an unknown key and
    /// the ceremony stops without changing anything.
    ///
    /// # Arguments
    /// * `candidate` - The key this tag is supposed to end up with.
    pub fn probe(self, candidate: MasterKey) -> Result<Ceremony<Changing<T>>> {
        let Probing { mut tag, key_no } = self.0;

        if let AuthOutcome::Accepted = tag.authenticate(key_no, &MasterKey::DEFAULT)? {
            return Ok(Ceremony(Changing {
                tag,
                key_no,
                old_key: MasterKey::DEFAULT,
                new_key: candidate,
                origin: KeyOrigin::Factory,
            }));
        }

        match tag.authenticate(key_no, &candidate)? {
            AuthOutcome::Accepted => Ok(Ceremony(Changing {
                tag,
                key_no,
                old_key: candidate.clone(),
                new_key: candidate,
                origin: KeyOrigin::Reasserted,
            })),
            AuthOutcome::Rejected => Err(Error::AuthenticationDenied),
        }
    }

    /// Enters the ceremony with a known current key, for rotation. The one
    /// authentication it attempts is the only guess allowed.
    ///
    /// # Arguments
    /// * `current` - The key the slot is believed to hold.
    /// * `next` - The key to rotate to.
    pub fn assert_current(
        self,
        current: MasterKey,
        next: MasterKey,
    ) -> Result<Ceremony<Changing<T>>> {
        let Probing { mut tag, key_no } = self.0;

        match tag.authenticate(key_no, &current)? {
            AuthOutcome::Accepted => Ok(Ceremony(Changing {
                tag,
                key_no,
                old_key: current,
                new_key: next,
                origin: KeyOrigin::Rotated,
            })),
            AuthOutcome::Rejected => Err(Error::AuthenticationDenied),
        }
    }
}

/// Contains the state to replace the key in the slot.
pub struct Changing<T> {
    tag: T,
    key_no: u8,
    old_key: MasterKey,
    new_key: MasterKey,
    origin: KeyOrigin,
}

impl<T: TagTransport> Ceremony<Changing<T>> {
    /// Replaces the key in the slot, authorized by the accepted key.
    pub fn change(self) -> Result<Ceremony<Confirming<T>>> {
        let Changing {
            mut tag,
            key_no,
            old_key,
            new_key,
            origin,
        } = self.0;

        tag.change_key(key_no, &old_key, &new_key, KEY_VERSION)?;

        Ok(Ceremony(Confirming {
            tag,
            key_no,
            new_key,
            origin,
        }))
    }
}

/// Contains the state to prove the key change took.
pub struct Confirming<T> {
    tag: T,
    key_no: u8,
    new_key: MasterKey,
    origin: KeyOrigin,
}

impl<T: TagTransport> Ceremony<Confirming<T>> {
    /// Confirms the new key and probes whether the factory default is
    /// locked out.
    ///
    /// A tag that rejects the new key right after accepting the change is
    /// in doubt and surfaces as `VerificationFailed`. A tag that still
    /// accepts the default afterwards works but is reported as merely
    /// provisioned, so the operator can pull it aside.
    pub fn confirm(self) -> Result<ProvisionReport> {
        let Confirming {
            mut tag,
            key_no,
            new_key,
            origin,
        } = self.0;

        if let AuthOutcome::Rejected = tag.authenticate(key_no, &new_key)? {
            return Err(Error::VerificationFailed);
        }

        let state = match tag.authenticate(key_no, &MasterKey::DEFAULT)? {
            AuthOutcome::Accepted => TagState::Provisioned,
            AuthOutcome::Rejected => TagState::Verified,
        };

        Ok(ProvisionReport { state, origin })
    }
}

/// Runs the full ceremony against the application master key slot.
///
/// # Arguments
/// * `tag` - The transport holding the tag.
/// * `candidate` - The key the tag is supposed to end up with.
pub fn provision<T: TagTransport>(tag: T, candidate: MasterKey) -> Result<ProvisionReport> {
    Ceremony::new(tag, APP_MASTER_KEY_NO)
        .probe(candidate)?
        .change()?
        .confirm()
}

/// Rotates the application master key from a known current key to the next
/// one.
///
/// # Arguments
/// * `tag` - The transport holding the tag.
/// * `current` - The key the slot is believed to hold.
/// * `next` - The key to rotate to.
pub fn rotate<T: TagTransport>(
    tag: T,
    current: MasterKey,
    next: MasterKey,
) -> Result<ProvisionReport> {
    Ceremony::new(tag, APP_MASTER_KEY_NO)
        .assert_current(current, next)?
        .change()?
        .confirm()
}
