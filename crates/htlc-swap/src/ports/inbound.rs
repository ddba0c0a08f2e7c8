//! # Inbound Ports
//!
//! API trait defining what the swap engine can do.

use crate::domain::{
    Address, Agreement, AgreementId, Image, LedgerRef, RequestContext, Secret, SwapError,
};

/// Arguments of a lock, already parsed into domain types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockRequest {
    /// Party allowed to claim.
    pub counterparty: Address,
    /// Image of the secret.
    pub image: Image,
    /// Amount to lock.
    pub amount: u64,
    /// Token contract holding the amount.
    pub token_contract: LedgerRef,
    /// Seconds from the transaction timestamp until expiry.
    pub lock_time: u64,
}

/// Swap API - inbound port.
pub trait SwapApi {
    /// Lock the caller's tokens in custody. Returns the new agreement ID.
    fn lock(&mut self, ctx: &RequestContext, request: LockRequest)
        -> Result<AgreementId, SwapError>;

    /// Return custody to the owner after expiry.
    fn unlock(&mut self, ctx: &RequestContext, agreement_id: &AgreementId)
        -> Result<(), SwapError>;

    /// Release custody to the counterparty before expiry.
    fn claim(
        &mut self,
        ctx: &RequestContext,
        agreement_id: &AgreementId,
        secret: Secret,
    ) -> Result<(), SwapError>;

    /// Look up an agreement.
    fn agreement(&self, agreement_id: &AgreementId) -> Result<Agreement, SwapError>;
}
