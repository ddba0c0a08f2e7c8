//! # Algorithms Module
//!
//! Hash locks and agreement ID derivation.

pub mod agreement_id;
pub mod secret;

pub use agreement_id::{derive_agreement_id, AgreementIdInput, AGREEMENT_ID_DOMAIN};
pub use secret::{create_image, generate_secret, sha256, verify_secret};
