//! # Domain Errors
//!
//! Error types for swap agreements, token ledgers and agreement storage.
//!
//! Every error aborts the enclosing transaction. Nothing is retried here;
//! resubmission is the caller's decision.

use super::value_objects::{Address, AgreementId, AgreementStatus, LedgerRef, Party};
use std::fmt;
use thiserror::Error;

/// Hash type (32-byte SHA-256).
pub type Hash = [u8; 32];

/// Which side of the expiry a timing guard rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimingViolation {
    /// Unlock attempted while the agreement is still running.
    NotYetExpired,
    /// Claim attempted after the agreement ran out.
    Expired,
}

impl fmt::Display for TimingViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotYetExpired => f.write_str("not yet expired"),
            Self::Expired => f.write_str("expired"),
        }
    }
}

/// Swap engine error types.
#[derive(Debug, Error)]
pub enum SwapError {
    /// Malformed or zero argument.
    #[error("Invalid {field}: {reason}")]
    Validation {
        /// Offending argument
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Derived agreement ID already present in the store.
    #[error("Agreement {0} already exists")]
    DuplicateAgreement(AgreementId),

    /// Unknown agreement ID.
    #[error("Agreement not found: {0}")]
    NotFound(AgreementId),

    /// Credential could not be resolved to an address.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// Caller is not the party the operation requires.
    #[error("Caller {caller} is not the {required} of agreement {agreement_id}")]
    Unauthorized {
        /// Agreement operated on
        agreement_id: AgreementId,
        /// Resolved caller
        caller: Address,
        /// Party the guard requires
        required: Party,
    },

    /// Expiry guard failed.
    #[error("Agreement {agreement_id} {violation}: expiry={expiry}, now={now}")]
    Timing {
        /// Agreement operated on
        agreement_id: AgreementId,
        /// Which guard failed
        violation: TimingViolation,
        /// Agreement expiry
        expiry: u64,
        /// Authoritative transaction time
        now: u64,
    },

    /// SHA-256 of the claim secret does not equal the image.
    #[error("Secret does not match image of agreement {0}")]
    SecretMismatch(AgreementId),

    /// Agreement is no longer Locked.
    #[error("Agreement {agreement_id} already settled ({status})")]
    AlreadySettled {
        /// Agreement operated on
        agreement_id: AgreementId,
        /// Terminal status it is in
        status: AgreementStatus,
    },

    /// Underlying token ledger rejected the transfer.
    #[error("Error transferring tokens in contract {ledger}: {source}")]
    LedgerTransfer {
        /// Token contract invoked
        ledger: LedgerRef,
        /// Ledger failure
        #[source]
        source: LedgerError,
    },

    /// Agreement store failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl SwapError {
    /// Validation error for an argument.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Stable category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::DuplicateAgreement(_) => ErrorKind::DuplicateAgreement,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidCredential(_) | Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::Timing { .. } => ErrorKind::Timing,
            Self::SecretMismatch(_) => ErrorKind::SecretMismatch,
            Self::AlreadySettled { .. } => ErrorKind::AlreadySettled,
            Self::LedgerTransfer { .. } => ErrorKind::LedgerTransfer,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

/// Error categories surfaced to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or zero arguments.
    Validation,
    /// Agreement ID collision on Lock.
    DuplicateAgreement,
    /// Unknown agreement ID.
    NotFound,
    /// Caller is not the required party.
    Authorization,
    /// Expiry guard failed.
    Timing,
    /// Claim secret does not hash to the image.
    SecretMismatch,
    /// Operation on a settled agreement.
    AlreadySettled,
    /// Token ledger call failed.
    LedgerTransfer,
    /// Agreement store failed.
    Storage,
}

impl ErrorKind {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::DuplicateAgreement => "duplicate_agreement",
            Self::NotFound => "not_found",
            Self::Authorization => "authorization",
            Self::Timing => "timing",
            Self::SecretMismatch => "secret_mismatch",
            Self::AlreadySettled => "already_settled",
            Self::LedgerTransfer => "ledger_transfer",
            Self::Storage => "storage",
        }
    }
}

/// Token ledger error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Transfers and approvals of zero tokens are rejected.
    #[error("Attempting to transfer zero amount")]
    ZeroAmount,

    /// Account cannot cover the amount.
    #[error("Insufficient balance for {account}: available={available}, required={required}")]
    InsufficientBalance {
        /// Debited account
        account: Address,
        /// Current balance
        available: u64,
        /// Requested amount
        required: u64,
    },

    /// Spender's approval does not cover the amount.
    #[error("Insufficient allowance for {spender} on {owner}: approved={approved}, required={required}")]
    InsufficientAllowance {
        /// Account the tokens belong to
        owner: Address,
        /// Account spending them
        spender: Address,
        /// Current approval
        approved: u64,
        /// Requested amount
        required: u64,
    },

    /// Crediting the account would overflow its balance.
    #[error("Balance overflow for {0}")]
    Overflow(Address),
}

/// Agreement store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend failure.
    #[error("Backend failure: {0}")]
    Backend(String),
}
