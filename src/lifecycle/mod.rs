//! The key ceremony taking a tag from factory keys to owned keys.
//!
//! A fresh tag ships with an all-zero application master key that anyone
//! can use. Taking ownership means replacing it, and doing so over a radio
//! link that can drop at any moment. The ceremony here keeps that safe: it
//! only ever offers two keys during authentication, it confirms a change
//! by authenticating with the new key afterwards, and it finishes by
//! probing that the factory default is really locked out. Each step
//! consumes the previous one, so a ceremony cannot run out of order.

mod api;
mod error;

pub use api::{
    provision, rotate, Ceremony, CeremonyState, Changing, Confirming, KeyOrigin, Probing,
    ProvisionReport, TagState, APP_MASTER_KEY_NO,
};
pub use error::Error;

/// The result type for the `lifecycle` module.
pub type Result<T> = core::result::Result<T, Error>;
