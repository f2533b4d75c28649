//! AES-128 restricted to single 16-byte blocks.

use aes::cipher::generic_array::GenericArray;
use aes::{Aes128, Block, BlockDecrypt, BlockEncrypt, NewBlockCipher};

use super::{Error, Result};

/// The width in bytes of a cipher block, which is also the key width.
pub const BLOCK_LEN: usize = 16;

/// A keyed AES-128 instance operating on exactly one block at a time.
///
/// This is the substrate for the CMAC engine and the ECB checksum path.
/// It deliberately offers no mode of operation, so anything beyond a single
/// block has to be built on top of it explicitly.
pub struct BlockCipher {
    cipher: Aes128,
}

impl BlockCipher {
    /// Creates a cipher from a key slice.
    ///
    /// # Arguments
    /// * `key` - The AES-128 key. Must be exactly 16 bytes.
    pub fn new(key: &[u8]) -> Result<BlockCipher> {
        if key.len() != BLOCK_LEN {
            return Err(Error::InvalidBlockSize(key.len()));
        }

        Ok(BlockCipher {
            cipher: Aes128::new(GenericArray::from_slice(key)),
        })
    }

    /// Creates a cipher from a key whose width is pinned by the type.
    pub fn from_key(key: &[u8; BLOCK_LEN]) -> BlockCipher {
        BlockCipher {
            cipher: Aes128::new(GenericArray::from_slice(key)),
        }
    }

    /// Encrypts a single block.
    ///
    /// # Arguments
    /// * `block` - The plaintext. Must be exactly 16 bytes.
    pub fn encrypt_block(&self, block: &[u8]) -> Result<[u8; BLOCK_LEN]> {
        let mut buf = to_block(block)?;
        self.cipher.encrypt_block(&mut buf);

        Ok(buf.into())
    }

    /// Decrypts a single block.
    ///
    /// # Arguments
    /// * `block` - The ciphertext. Must be exactly 16 bytes.
    pub fn decrypt_block(&self, block: &[u8]) -> Result<[u8; BLOCK_LEN]> {
        let mut buf = to_block(block)?;
        self.cipher.decrypt_block(&mut buf);

        Ok(buf.into())
    }

    /// Encrypts a fixed-size block in place, skipping the length check.
    pub(crate) fn encrypt_in_place(&self, block: &mut [u8; BLOCK_LEN]) {
        self.cipher.encrypt_block(Block::from_mut_slice(block));
    }
}

fn to_block(bytes: &[u8]) -> Result<Block> {
    if bytes.len() != BLOCK_LEN {
        return Err(Error::InvalidBlockSize(bytes.len()));
    }

    Ok(Block::clone_from_slice(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    // FIPS 197 Appendix C.1 example vectors.
    const KEY: [u8; 16] = hex!("000102030405060708090A0B0C0D0E0F");
    const PLAINTEXT: [u8; 16] = hex!("00112233445566778899AABBCCDDEEFF");
    const CIPHERTEXT: [u8; 16] = hex!("69C4E0D86A7B0430D8CDB78070B4C55A");

    #[test]
    fn encrypt_vector() {
        let cipher = BlockCipher::from_key(&KEY);
        assert_eq!(CIPHERTEXT, cipher.encrypt_block(&PLAINTEXT).unwrap());
    }

    #[test]
    fn decrypt_vector() {
        let cipher = BlockCipher::from_key(&KEY);
        assert_eq!(PLAINTEXT, cipher.decrypt_block(&CIPHERTEXT).unwrap());
    }

    #[test]
    fn decrypt_inverts_encrypt() {
        let cipher = BlockCipher::from_key(&KEY);
        let block = [0xA5; BLOCK_LEN];
        let encrypted = cipher.encrypt_block(&block).unwrap();

        assert_ne!(block, encrypted);
        assert_eq!(block, cipher.decrypt_block(&encrypted).unwrap());
    }

    #[test]
    fn rejects_wrong_widths() {
        assert_eq!(
            Some(Error::InvalidBlockSize(15)),
            BlockCipher::new(&[0; 15]).err()
        );
        let cipher = BlockCipher::from_key(&KEY);
        assert_eq!(Err(Error::InvalidBlockSize(17)), cipher.encrypt_block(&[0; 17]));
        assert_eq!(Err(Error::InvalidBlockSize(0)), cipher.decrypt_block(&[]));
    }
}
