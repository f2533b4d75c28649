//! CMAC over AES-128, as specified in NIST SP 800-38B and RFC 4493.

use super::block::{BlockCipher, BLOCK_LEN};

/// The reduction constant for doubling in GF(2^128), `Rb` in SP 800-38B.
const RB: u8 = 0x87;

/// A CMAC engine holding a keyed cipher and its two derived subkeys.
///
/// One instance can authenticate any number of messages under the same key,
/// so the subkey derivation cost is paid once.
pub struct Cmac {
    cipher: BlockCipher,
    k1: [u8; BLOCK_LEN],
    k2: [u8; BLOCK_LEN],
}

impl Cmac {
    /// Creates an engine for the given key, deriving the subkeys K1 and K2.
    ///
    /// # Arguments
    /// * `key` - The AES-128 key.
    pub fn new(key: &[u8; BLOCK_LEN]) -> Cmac {
        let cipher = BlockCipher::from_key(key);

        // K1 and K2 are successive GF(2^128) doublings of E_K(0^128).
        let mut l = [0; BLOCK_LEN];
        cipher.encrypt_in_place(&mut l);
        let k1 = double(&l);
        let k2 = double(&k1);

        Cmac { cipher, k1, k2 }
    }

    /// Computes the full 16-byte authentication code over a message of any
    /// length, including the empty one.
    ///
    /// # Arguments
    /// * `message` - The message to authenticate.
    pub fn authenticate(&self, message: &[u8]) -> [u8; BLOCK_LEN] {
        // The empty message still occupies one (padded) block.
        let n_blocks = if message.is_empty() {
            1
        } else {
            (message.len() + BLOCK_LEN - 1) / BLOCK_LEN
        };
        let complete = !message.is_empty() && message.len() % BLOCK_LEN == 0;

        // CBC chain over everything before the final block.
        let mut x = [0; BLOCK_LEN];
        for i in 0..n_blocks - 1 {
            xor_in_place(&mut x, &message[i * BLOCK_LEN..(i + 1) * BLOCK_LEN]);
            self.cipher.encrypt_in_place(&mut x);
        }

        // The final block is masked with K1 when it is complete and with K2
        // after 10* padding when it is not.
        let tail = &message[(n_blocks - 1) * BLOCK_LEN..];
        let mut last = [0; BLOCK_LEN];
        if complete {
            last.copy_from_slice(tail);
            xor_in_place(&mut last, &self.k1);
        } else {
            last[..tail.len()].copy_from_slice(tail);
            last[tail.len()] = 0x80;
            xor_in_place(&mut last, &self.k2);
        }

        xor_in_place(&mut x, &last);
        self.cipher.encrypt_in_place(&mut x);

        x
    }
}

/// Doubles a block in GF(2^128): a left shift by one bit, with the dropped
/// high bit folded back into the low byte as the `Rb` reduction.
fn double(block: &[u8; BLOCK_LEN]) -> [u8; BLOCK_LEN] {
    let mut out = [0; BLOCK_LEN];
    let mut carry = 0;
    for i in (0..BLOCK_LEN).rev() {
        out[i] = (block[i] << 1) | carry;
        carry = block[i] >> 7;
    }
    if carry == 1 {
        out[BLOCK_LEN - 1] ^= RB;
    }

    out
}

fn xor_in_place(acc: &mut [u8; BLOCK_LEN], block: &[u8]) {
    for (b1, b2) in acc.iter_mut().zip(block.iter()) {
        *b1 ^= b2;
    }
}
