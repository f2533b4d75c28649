//! The wire values a tag in mirror mode substitutes into its scan URL.
//!
//! All three values travel as hex query parameters. Parsing accepts either
//! case, rendering always produces uppercase, matching what the tag itself
//! writes into the URL template.

use alloc::string::String;

use super::{Error, Result};

/// The width of a tag UID in bytes.
pub const UID_LEN: usize = 7;

/// The width of a truncated authentication code in bytes.
pub const CODE_LEN: usize = 8;

/// A 7-byte tag UID, 14 hex characters on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uid([u8; UID_LEN]);

impl Uid {
    /// Creates a UID from its raw bytes.
    pub fn new(bytes: [u8; UID_LEN]) -> Uid {
        Uid(bytes)
    }

    /// Parses the 14-character wire form.
    pub fn from_hex(hex_str: &str) -> Result<Uid> {
        let mut bytes = [0; UID_LEN];
        decode_exact(hex_str, &mut bytes)?;

        Ok(Uid(bytes))
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8; UID_LEN] {
        &self.0
    }

    /// Renders the uppercase wire form.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

/// The tag's scan counter, incremented by the hardware on every read.
///
/// It is 24 bits wide and never wraps. On the wire it travels as 6
/// big-endian hex characters, while the session derivation input carries it
/// as 3 little-endian bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScanCounter(u32);

impl ScanCounter {
    /// The highest value the hardware counter can reach.
    pub const MAX: ScanCounter = ScanCounter(0x00FF_FFFF);

    /// Creates a counter, rejecting values beyond 24 bits.
    pub fn new(value: u32) -> Result<ScanCounter> {
        if value > ScanCounter::MAX.0 {
            return Err(Error::CounterOutOfRange(value));
        }

        Ok(ScanCounter(value))
    }

    /// Parses the 6-character big-endian wire form.
    pub fn from_hex(hex_str: &str) -> Result<ScanCounter> {
        let mut bytes = [0; 3];
        decode_exact(hex_str, &mut bytes)?;

        Ok(ScanCounter(u32::from_be_bytes([
            0, bytes[0], bytes[1], bytes[2],
        ])))
    }

    /// Returns the counter value.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Renders the uppercase wire form.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.0.to_be_bytes()[1..])
    }

    /// Returns the little-endian layout used in the session derivation
    /// input.
    pub fn to_le_bytes(&self) -> [u8; 3] {
        let le = self.0.to_le_bytes();
        [le[0], le[1], le[2]]
    }
}

/// An 8-byte truncated authentication code, 16 hex characters on the wire.
///
/// A code is public the moment a URL exists, so unlike the key types this
/// one has an ordinary `Debug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdmCode([u8; CODE_LEN]);

impl SdmCode {
    /// Creates a code from its raw bytes.
    pub fn new(bytes: [u8; CODE_LEN]) -> SdmCode {
        SdmCode(bytes)
    }

    /// Parses the 16-character wire form.
    pub fn from_hex(hex_str: &str) -> Result<SdmCode> {
        let mut bytes = [0; CODE_LEN];
        decode_exact(hex_str, &mut bytes)?;

        Ok(SdmCode(bytes))
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8; CODE_LEN] {
        &self.0
    }

    /// Renders the uppercase wire form.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }
}

/// The authenticated part of one scan: which tag, and which press of its
/// counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanMessage {
    /// The UID mirrored into the URL.
    pub uid: Uid,
    /// The counter value mirrored into the URL.
    pub counter: ScanCounter,
}

impl ScanMessage {
    /// Builds a message from already-parsed values.
    pub fn new(uid: Uid, counter: ScanCounter) -> ScanMessage {
        ScanMessage { uid, counter }
    }

    /// Parses the UID and counter query values of a scan URL.
    ///
    /// # Arguments
    /// * `uid_hex` - The 14-character UID value.
    /// * `counter_hex` - The 6-character counter value.
    pub fn from_hex(uid_hex: &str, counter_hex: &str) -> Result<ScanMessage> {
        Ok(ScanMessage {
            uid: Uid::from_hex(uid_hex)?,
            counter: ScanCounter::from_hex(counter_hex)?,
        })
    }
}

/// Decodes a hex value into a fixed-width buffer, rejecting anything other
/// than exactly `2 * out.len()` hex characters.
fn decode_exact(hex_str: &str, out: &mut [u8]) -> Result<()> {
    hex::decode_to_slice(hex_str, out).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { .. } => Error::InvalidHex,
        _ => Error::InvalidLength {
            expected: 2 * out.len(),
            actual: hex_str.len(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uid_wire_round_trip() {
        let uid = Uid::from_hex("048d58d2142290").unwrap();
        assert_eq!([0x04, 0x8D, 0x58, 0xD2, 0x14, 0x22, 0x90], *uid.as_bytes());
        assert_eq!("048D58D2142290", uid.to_hex());
    }

    #[test]
    fn uid_rejects_wrong_widths() {
        assert_eq!(
            Err(Error::InvalidLength {
                expected: 14,
                actual: 12
            }),
            Uid::from_hex("048d58d21422")
        );
        assert_eq!(
            Err(Error::InvalidLength {
                expected: 14,
                actual: 16
            }),
            Uid::from_hex("048d58d214229000")
        );
    }

    #[test]
    fn non_hex_characters() {
        assert_eq!(Err(Error::InvalidHex), Uid::from_hex("048x58d2142290"));
        assert_eq!(Err(Error::InvalidHex), ScanCounter::from_hex("00-00A"));
    }

    #[test]
    fn counter_wire_is_big_endian() {
        let counter = ScanCounter::from_hex("00000a").unwrap();
        assert_eq!(10, counter.value());
        assert_eq!("00000A", counter.to_hex());

        assert_eq!(0x0A0B0C, ScanCounter::from_hex("0A0B0C").unwrap().value());
    }

    #[test]
    fn counter_derivation_layout_is_little_endian() {
        let counter = ScanCounter::new(0x0A0B0C).unwrap();
        assert_eq!([0x0C, 0x0B, 0x0A], counter.to_le_bytes());
    }

    #[test]
    fn counter_stops_at_24_bits() {
        assert!(ScanCounter::new(0x00FF_FFFF).is_ok());
        assert_eq!(
            Err(Error::CounterOutOfRange(0x0100_0000)),
            ScanCounter::new(0x0100_0000)
        );
    }

    #[test]
    fn code_wire_round_trip() {
        let code = SdmCode::from_hex("82e278c1118cee2f").unwrap();
        assert_eq!("82E278C1118CEE2F", code.to_hex());
        assert_eq!(code, SdmCode::from_hex(&code.to_hex()).unwrap());
    }

    #[test]
    fn message_parses_both_values() {
        let message = ScanMessage::from_hex("048D58D2142290", "000001").unwrap();
        assert_eq!(Uid::from_hex("048D58D2142290").unwrap(), message.uid);
        assert_eq!(1, message.counter.value());
    }
}
