//! A symmetric-key security core for
//! [NTAG 424 DNA](https://www.nxp.com/products/NTAG424DNA)
//! style contactless tags, intended to sit behind whatever NFC transport
//! a host brings.
//!
//! The crate covers the offline half of running a fleet of tags: taking
//! ownership of a tag's application master key and rotating it later
//! ([`lifecycle`]), encoding the file settings that turn on mirrored scan
//! URLs ([`policy`]), reproducing and checking the dynamic codes those
//! URLs carry ([`sun`]), and sealing static group/rule identifiers into
//! verifiable checksums with a prefix-indexed store ([`token`]).
//! Underneath sit a strict single-block AES-128 primitive and a CMAC
//! engine ([`crypto`]), and key material lives in the self-wiping types of
//! [`key`]. Nothing here talks to a reader: hosts implement
//! [`transport::TagTransport`] over their channel and plug a store into
//! [`token::TokenStore`].
//!
//! ## Security
//! Two values in this system are deliberately short. A mirrored scan code
//! is 8 of the 16 CMAC bytes, and a checksum travels as 10 of its 32 hex
//! characters, so checksum verification rests on 40 bits. That defeats
//! casual forgery and URL tampering, not an adversary free to grind
//! guesses against an online endpoint, which therefore still needs rate
//! limiting. Keys never appear in `Debug` output or error texts, but the
//! host is responsible for where passphrases and key files live.

#![no_std]
#[macro_use]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;
#[cfg(test)]
#[macro_use]
extern crate hex_literal;

pub mod crypto;
pub mod key;
pub mod lifecycle;
pub mod policy;
pub mod sun;
pub mod token;
pub mod transport;
