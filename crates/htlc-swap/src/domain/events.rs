//! # Domain Events
//!
//! Notifications raised by successful swap and token operations. Observers
//! receive the event name together with a JSON payload.

use super::value_objects::{Address, AgreementId, Image, LedgerRef, Secret};
use serde::{Deserialize, Serialize};

/// Raised when a new agreement locks tokens in custody.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedEvent {
    pub agreement_id: AgreementId,
    pub owner: Address,
    pub counterparty: Address,
    pub image: Image,
    pub amount: u64,
    pub expiry: u64,
}

/// Raised when the owner recovers tokens after expiry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockedEvent {
    pub agreement_id: AgreementId,
}

/// Raised when the counterparty claims with the secret.
///
/// Publishing the secret lets the owner's counterparty complete the mirrored
/// leg on the other ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimedEvent {
    pub agreement_id: AgreementId,
    pub secret: Secret,
}

/// Raised by a direct Transfer or TransferFrom on a token ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferredEvent {
    pub ledger: LedgerRef,
    pub from: Address,
    pub to: Address,
    pub amount: u64,
}

/// Raised when an owner sets a spender's allowance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedEvent {
    pub ledger: LedgerRef,
    pub owner: Address,
    pub spender: Address,
    pub amount: u64,
}

/// Any event the engine emits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum SwapEvent {
    Locked(LockedEvent),
    Unlocked(UnlockedEvent),
    Claimed(ClaimedEvent),
    Transferred(TransferredEvent),
    Approved(ApprovedEvent),
}

impl SwapEvent {
    /// Event name as delivered to observers.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Locked(_) => "Locked",
            Self::Unlocked(_) => "Unlocked",
            Self::Claimed(_) => "Claimed",
            Self::Transferred(_) => "Transferred",
            Self::Approved(_) => "Approved",
        }
    }

    /// Agreement the event refers to, `None` for token events.
    pub fn agreement_id(&self) -> Option<&AgreementId> {
        match self {
            Self::Locked(e) => Some(&e.agreement_id),
            Self::Unlocked(e) => Some(&e.agreement_id),
            Self::Claimed(e) => Some(&e.agreement_id),
            Self::Transferred(_) | Self::Approved(_) => None,
        }
    }

    /// JSON payload without the name tag.
    pub fn payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            Self::Locked(e) => serde_json::to_vec(e),
            Self::Unlocked(e) => serde_json::to_vec(e),
            Self::Claimed(e) => serde_json::to_vec(e),
            Self::Transferred(e) => serde_json::to_vec(e),
            Self::Approved(e) => serde_json::to_vec(e),
        }
    }
}
