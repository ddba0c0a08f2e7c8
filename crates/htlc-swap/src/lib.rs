//! # HTLC Swap Engine
//!
//! Hash time-locked agreements over fungible token ledgers.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! One leg of a cross-ledger atomic swap:
//! - `Lock` moves the owner's tokens into custody under the SHA-256 image of
//!   a secret
//! - `Claim` releases them to the counterparty before expiry, given the secret
//! - `Unlock` returns them to the owner after expiry
//!
//! Claiming publishes the secret in the `Claimed` event, which is what lets
//! the mirrored agreement on the other ledger be claimed in turn.
//!
//! ## Guarantees
//!
//! | Guarantee | Mechanism |
//! |-----------|-----------|
//! | Single settlement | `Locked -> Unlocked \| Claimed`, both terminal |
//! | Disjoint windows | claim iff `now < expiry`, unlock iff `now > expiry` |
//! | All-or-nothing | host commits state, transfers and events together |
//! | Deterministic time | `now` is the transaction timestamp, never a clock |
//!
//! ## Module Structure
//!
//! ```text
//! htlc-swap/
//! ├── domain/          # Agreement, value objects, events, errors, invariants
//! ├── algorithms/      # Hash locks, agreement ID derivation
//! ├── ports/           # SwapApi, TokenLedger, AgreementStore, ...
//! ├── application/     # SwapEngine
//! ├── adapters/        # In-memory store, token, identity, host
//! └── ipc/             # Invocation payloads and dispatch
//! ```

#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ipc;
pub mod ports;

// Re-exports
pub use adapters::{
    BufferedEventEmitter, FungibleToken, InMemoryAgreementStore, InMemoryHost,
    InMemoryLedgerRegistry, PublishedEvent, Sha256IdentityResolver, TokenMetadata,
};
pub use algorithms::{create_image, derive_agreement_id, generate_secret, verify_secret};
pub use application::SwapEngine;
pub use config::SwapConfig;
pub use domain::{
    Address, Agreement, AgreementId, AgreementStatus, ApprovedEvent, ClaimedEvent, Credential,
    ErrorKind, Image, LedgerError, LedgerRef, LockedEvent, Party, RequestContext, Secret,
    StoreError, SwapError, SwapEvent, TimingViolation, TransferredEvent, TxInfo, UnlockedEvent,
};
pub use ipc::{Call, Invocation, InvocationResponse, SwapOperation, TokenOperation};
pub use ports::{
    AgreementStore, EventEmitter, IdentityResolver, LedgerRegistry, LockRequest, SwapApi,
    TokenLedger,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
