//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory implementations of the outbound ports, plus the host that runs
//! them as one transaction per invocation.

mod event_buffer;
mod fungible_token;
mod host;
mod identity;
mod memory_store;

pub use event_buffer::BufferedEventEmitter;
pub use fungible_token::{AccountBalance, FungibleToken, InMemoryLedgerRegistry, TokenMetadata};
pub use host::{InMemoryHost, PublishedEvent, EVENT_CHANNEL_CAPACITY};
pub use identity::Sha256IdentityResolver;
pub use memory_store::InMemoryAgreementStore;
