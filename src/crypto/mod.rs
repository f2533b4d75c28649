//! The AES-128 block primitive and the CMAC engine built on top of it.

mod block;
mod cmac;
mod error;

pub use block::{BlockCipher, BLOCK_LEN};
pub use cmac::Cmac;
pub use error::Error;

/// The result type for the `crypto` module.
pub type Result<T> = core::result::Result<T, Error>;
