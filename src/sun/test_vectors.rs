//! Scan vectors captured from a production NTAG 424 DNA tag.

/// The tag's scan-authentication master key.
pub const TAG_KEY: [u8; 16] = hex!("e4dae5db65c91efdf74ef3eba21b36c3");

/// The tag's UID.
pub const TAG_UID: [u8; 7] = hex!("048d58d2142290");

/// Three consecutive reads of the tag as (counter, mirrored code) pairs.
pub const SCANS: [(u32, [u8; 8]); 3] = [
    (10, hex!("82e278c1118cee2f")),
    (11, hex!("b5939af5e1dfd702")),
    (12, hex!("53a929063d0acd94")),
];
