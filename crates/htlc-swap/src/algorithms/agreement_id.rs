//! # Agreement Identifiers
//!
//! Deterministic IDs derived from the lock transaction and its parties.
//!
//! Each field is length-prefixed so distinct inputs can never concatenate to
//! the same byte string, and a domain tag keeps these digests apart from any
//! other SHA-256 use.

use super::secret::sha256;
use crate::domain::{Address, AgreementId, Image};

/// Domain separation tag for agreement IDs.
pub const AGREEMENT_ID_DOMAIN: &[u8] = b"htlc-swap/agreement/v1";

/// Inputs to agreement ID derivation.
#[derive(Clone, Copy, Debug)]
pub struct AgreementIdInput<'a> {
    /// Lock transaction ID.
    pub tx_id: &'a str,
    /// Resolved owner.
    pub owner: &'a Address,
    /// Counterparty.
    pub counterparty: &'a Address,
    /// Transaction timestamp.
    pub timestamp: u64,
    /// Image of the secret.
    pub image: &'a Image,
}

fn push_field(buf: &mut Vec<u8>, field: &[u8]) {
    buf.extend_from_slice(&(field.len() as u64).to_be_bytes());
    buf.extend_from_slice(field);
}

/// Derive the agreement ID as hex SHA-256 over the encoded inputs.
pub fn derive_agreement_id(input: &AgreementIdInput<'_>) -> AgreementId {
    let mut buf = Vec::with_capacity(256);
    push_field(&mut buf, AGREEMENT_ID_DOMAIN);
    push_field(&mut buf, input.tx_id.as_bytes());
    push_field(&mut buf, input.owner.as_str().as_bytes());
    push_field(&mut buf, input.counterparty.as_str().as_bytes());
    push_field(&mut buf, &input.timestamp.to_be_bytes());
    push_field(&mut buf, input.image.as_bytes());
    AgreementId::from_digest(&sha256(&buf))
}
