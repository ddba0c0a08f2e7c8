//! # Ports Module
//!
//! Hexagonal architecture ports for the swap engine.

pub mod inbound;
pub mod outbound;

pub use inbound::{LockRequest, SwapApi};
pub use outbound::{AgreementStore, EventEmitter, IdentityResolver, LedgerRegistry, TokenLedger};
