//! # Domain Entities
//!
//! The swap agreement: the only record the engine persists.

use super::errors::SwapError;
use super::value_objects::{Address, AgreementId, AgreementStatus, Image, LedgerRef};
use serde::{Deserialize, Serialize};

/// A swap agreement between an owner of tokens and a counterparty.
///
/// Captures the token contract, the amount in custody and the image of the
/// secret that releases it. Only `status` changes after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agreement {
    /// Unique identifier.
    pub agreement_id: AgreementId,
    /// Token owner and creator of the agreement.
    pub owner: Address,
    /// Party allowed to claim before expiry.
    pub counterparty: Address,
    /// Image of the secret required to claim.
    pub image: Image,
    /// Amount held in custody.
    pub amount: u64,
    /// Token contract the amount lives on.
    pub token_contract: LedgerRef,
    /// Transaction time after which the owner may unlock.
    pub expiry: u64,
    /// Current state.
    pub status: AgreementStatus,
}

/// Parameters for creating an agreement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgreementParams {
    /// Unique identifier.
    pub agreement_id: AgreementId,
    /// Creator of the lock.
    pub owner: Address,
    /// Claiming party.
    pub counterparty: Address,
    /// Image of the secret.
    pub image: Image,
    /// Amount locked.
    pub amount: u64,
    /// Token contract.
    pub token_contract: LedgerRef,
    /// Expiration timestamp.
    pub expiry: u64,
}

impl Agreement {
    /// Create a new agreement in the Locked state.
    pub fn new(params: AgreementParams) -> Self {
        Self {
            agreement_id: params.agreement_id,
            owner: params.owner,
            counterparty: params.counterparty,
            image: params.image,
            amount: params.amount,
            token_contract: params.token_contract,
            expiry: params.expiry,
            status: AgreementStatus::Locked,
        }
    }

    /// Unlock window is open strictly after expiry.
    pub fn is_expired(&self, now: u64) -> bool {
        now > self.expiry
    }

    /// Claim window is open strictly before expiry.
    pub fn is_claimable(&self, now: u64) -> bool {
        now < self.expiry
    }

    /// Whether the agreement still holds funds.
    pub fn is_locked(&self) -> bool {
        self.status == AgreementStatus::Locked
    }

    /// Move to a terminal status.
    pub fn settle(&mut self, status: AgreementStatus) -> Result<(), SwapError> {
        if !self.status.can_transition_to(status) {
            return Err(SwapError::AlreadySettled {
                agreement_id: self.agreement_id.clone(),
                status: self.status,
            });
        }
        self.status = status;
        Ok(())
    }
}
