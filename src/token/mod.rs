//! Sealed identifier checksums and their prefix-indexed store.
//!
//! Alongside the dynamic scan URLs, hosts hand out static URLs that name a
//! group and a rule. To keep those from being minted freely, the pair is
//! sealed into a checksum under a master key and only the first ten hex
//! characters travel in the URL. The full checksum sits in a store indexed
//! by that prefix, so a presented prefix can be expanded back and the
//! whole thing re-verified.
//!
//! Ten hex characters are 40 bits of the 128-bit checksum; see the crate
//! docs for what that truncation does and does not protect against.

mod error;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp;

use crate::crypto::{BlockCipher, BLOCK_LEN};
use crate::key::MasterKey;

pub use error::Error;

/// The result type for the `token` module.
pub type Result<T> = core::result::Result<T, Error>;

/// The number of checksum characters that travel in a URL and key the
/// store.
pub const PREFIX_LEN: usize = 10;

/// Seals a group/rule identifier pair into a checksum.
///
/// The pair is joined with `:`, padded with a single 0x80 byte and zeros
/// up to a whole number of blocks, and encrypted block by block under the
/// key. No chaining: the same pair always seals to the same checksum, which
/// is what makes the prefix a stable index. The result is uppercase hex.
///
/// # Arguments
/// * `gid` - The group identifier.
/// * `rid` - The rule identifier.
/// * `key` - The sealing key.
pub fn seal(gid: &str, rid: &str, key: &MasterKey) -> String {
    let mut message = Vec::with_capacity(gid.len() + rid.len() + 1 + BLOCK_LEN);
    message.extend_from_slice(gid.as_bytes());
    message.push(b':');
    message.extend_from_slice(rid.as_bytes());

    // The marker byte always goes in, so block-aligned input gains a
    // whole padding block and stripping stays unambiguous.
    message.push(0x80);
    while message.len() % BLOCK_LEN != 0 {
        message.push(0);
    }

    let cipher = BlockCipher::from_key(key.as_bytes());
    let mut ciphertext = Vec::with_capacity(message.len());
    for chunk in message.chunks_exact(BLOCK_LEN) {
        let mut block = [0; BLOCK_LEN];
        block.copy_from_slice(chunk);
        cipher.encrypt_in_place(&mut block);
        ciphertext.extend_from_slice(&block);
    }

    hex::encode_upper(ciphertext)
}

/// Checks a presented checksum against an identifier pair.
///
/// Only the first [`PREFIX_LEN`] characters are compared, without regard
/// to case, since only the prefix travels on the wire. A mismatch is an
/// ordinary `false`, not an error.
///
/// # Arguments
/// * `checksum` - The presented checksum or prefix.
/// * `gid` - The group identifier.
/// * `rid` - The rule identifier.
/// * `key` - The sealing key.
pub fn verify(checksum: &str, gid: &str, rid: &str, key: &MasterKey) -> bool {
    let expected = seal(gid, rid, key);
    if checksum.len() < PREFIX_LEN {
        return false;
    }

    checksum.as_bytes()[..PREFIX_LEN].eq_ignore_ascii_case(&expected.as_bytes()[..PREFIX_LEN])
}

/// Decrypts a full checksum back into the joined `gid:rid` pair.
///
/// Returns an empty string on any corruption: non-hex characters, a length
/// that is not a whole number of blocks, missing padding or a pair that is
/// not UTF-8. Quietly, since a checksum is a public value and callers only
/// care whether a usable pair comes out.
///
/// # Arguments
/// * `checksum` - The full checksum, as produced by [`seal`].
/// * `key` - The sealing key.
pub fn open(checksum: &str, key: &MasterKey) -> String {
    open_checked(checksum, key).unwrap_or_default()
}

fn open_checked(checksum: &str, key: &MasterKey) -> Option<String> {
    let ciphertext = hex::decode(checksum).ok()?;
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return None;
    }

    let cipher = BlockCipher::from_key(key.as_bytes());
    let mut message = Vec::with_capacity(ciphertext.len());
    for chunk in ciphertext.chunks_exact(BLOCK_LEN) {
        message.extend_from_slice(&cipher.decrypt_block(chunk).ok()?);
    }

    while message.last() == Some(&0) {
        message.pop();
    }
    if message.pop()? != 0x80 {
        return None;
    }

    String::from_utf8(message).ok()
}

/// Durable storage for issued checksums, keyed by their prefix.
///
/// Any key-value store with synchronous get/put works; [`MemoryStore`] is
/// the in-process one.
pub trait TokenStore {
    /// Stores a checksum under a prefix, replacing any earlier entry.
    fn put(&mut self, prefix: &str, checksum: &str);

    /// Looks up the checksum stored under a prefix.
    fn get(&self, prefix: &str) -> Option<String>;
}

/// Indexes a full checksum under its own prefix.
///
/// # Arguments
/// * `store` - The store to write to.
/// * `checksum` - The full checksum, as produced by [`seal`].
pub fn store<S: TokenStore>(store: &mut S, checksum: &str) {
    store.put(&index_key(checksum), checksum);
}

/// Expands a presented prefix back to the full stored checksum.
///
/// # Arguments
/// * `store` - The store to read from.
/// * `prefix` - The prefix from the wire; a full checksum also works.
pub fn retrieve<S: TokenStore>(store: &S, prefix: &str) -> Result<String> {
    store.get(&index_key(prefix)).ok_or(Error::NotFound)
}

/// The index form of a checksum or prefix: its leading characters,
/// uppercased to match what [`seal`] renders.
fn index_key(value: &str) -> String {
    let end = cmp::min(PREFIX_LEN, value.len());
    value
        .chars()
        .take(end)
        .collect::<String>()
        .to_ascii_uppercase()
}

/// An in-process store backed by a map, for tests and simple hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> MemoryStore {
        MemoryStore {
            entries: BTreeMap::new(),
        }
    }
}

impl TokenStore for MemoryStore {
    fn put(&mut self, prefix: &str, checksum: &str) {
        self.entries
            .insert(String::from(prefix), String::from(checksum));
    }

    fn get(&self, prefix: &str) -> Option<String> {
        self.entries.get(prefix).cloned()
    }
}
