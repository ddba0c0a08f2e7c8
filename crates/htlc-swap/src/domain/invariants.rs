//! # Domain Invariants
//!
//! Guards evaluated by the engine before any transfer is attempted.

use super::entities::Agreement;
use super::errors::{SwapError, TimingViolation};
use super::value_objects::{Address, AgreementStatus, Party, Secret};
use crate::algorithms::verify_secret;

/// Invariant: Positive amount.
pub fn invariant_positive_amount(amount: u64) -> Result<(), SwapError> {
    if amount == 0 {
        return Err(SwapError::invalid("amount", "must be greater than zero"));
    }
    Ok(())
}

/// Invariant: Lock time is positive, within the configured cap, and the
/// resulting expiry is representable.
///
/// Returns the expiry.
pub fn invariant_lock_time(now: u64, lock_time: u64, max: Option<u64>) -> Result<u64, SwapError> {
    if lock_time == 0 {
        return Err(SwapError::invalid("lock_time", "must be greater than zero"));
    }
    if let Some(max) = max {
        if lock_time > max {
            return Err(SwapError::invalid(
                "lock_time",
                format!("{} exceeds maximum of {} seconds", lock_time, max),
            ));
        }
    }
    now.checked_add(lock_time)
        .ok_or_else(|| SwapError::invalid("lock_time", "expiry overflows"))
}

/// Invariant: Counterparty is a key holder distinct from the owner.
pub fn invariant_distinct_parties(owner: &Address, counterparty: &Address) -> Result<(), SwapError> {
    if counterparty.is_custody() {
        return Err(SwapError::invalid(
            "counterparty",
            "must be an account address, not a contract",
        ));
    }
    if owner == counterparty {
        return Err(SwapError::invalid("counterparty", "must differ from the owner"));
    }
    Ok(())
}

/// Invariant: Agreement has not been settled.
pub fn invariant_locked(agreement: &Agreement) -> Result<(), SwapError> {
    if agreement.status != AgreementStatus::Locked {
        return Err(SwapError::AlreadySettled {
            agreement_id: agreement.agreement_id.clone(),
            status: agreement.status,
        });
    }
    Ok(())
}

/// Invariant: Caller is the party the operation requires.
pub fn invariant_authorized(
    agreement: &Agreement,
    caller: &Address,
    required: Party,
) -> Result<(), SwapError> {
    let expected = match required {
        Party::Owner => &agreement.owner,
        Party::Counterparty => &agreement.counterparty,
    };
    if caller != expected {
        return Err(SwapError::Unauthorized {
            agreement_id: agreement.agreement_id.clone(),
            caller: caller.clone(),
            required,
        });
    }
    Ok(())
}

/// Invariant: Unlock only strictly after expiry.
pub fn invariant_expired(agreement: &Agreement, now: u64) -> Result<(), SwapError> {
    if !agreement.is_expired(now) {
        return Err(SwapError::Timing {
            agreement_id: agreement.agreement_id.clone(),
            violation: TimingViolation::NotYetExpired,
            expiry: agreement.expiry,
            now,
        });
    }
    Ok(())
}

/// Invariant: Claim only strictly before expiry.
pub fn invariant_unexpired(agreement: &Agreement, now: u64) -> Result<(), SwapError> {
    if !agreement.is_claimable(now) {
        return Err(SwapError::Timing {
            agreement_id: agreement.agreement_id.clone(),
            violation: TimingViolation::Expired,
            expiry: agreement.expiry,
            now,
        });
    }
    Ok(())
}

/// Invariant: SHA-256(secret) equals the agreement image.
pub fn invariant_secret_matches(agreement: &Agreement, secret: &Secret) -> Result<(), SwapError> {
    if !verify_secret(secret, &agreement.image) {
        return Err(SwapError::SecretMismatch(agreement.agreement_id.clone()));
    }
    Ok(())
}
