//! # Outbound Ports
//!
//! Traits for what the engine depends on: token ledgers, caller identity,
//! agreement persistence and event delivery.
//!
//! All ports are synchronous. A call runs to completion inside one host
//! transaction and never suspends.

use crate::domain::{
    Address, Agreement, AgreementId, Credential, LedgerError, LedgerRef, StoreError, SwapError,
    SwapEvent,
};

/// Fungible token ledger - outbound port.
///
/// The invoker of every mutating call is explicit. A ledger never infers who
/// is calling it.
pub trait TokenLedger: Send {
    /// Move `amount` from `sender` to `to`.
    fn transfer(&mut self, sender: &Address, to: &Address, amount: u64) -> Result<(), LedgerError>;

    /// Move `amount` from `from` to `to` against `spender`'s approval.
    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<(), LedgerError>;

    /// Set `spender`'s approval on `owner`'s tokens, replacing any previous one.
    fn approve(&mut self, owner: &Address, spender: &Address, amount: u64)
        -> Result<(), LedgerError>;

    /// Current approval of `spender` on `owner`'s tokens.
    fn allowance(&self, owner: &Address, spender: &Address) -> u64;

    /// Available balance of `owner`.
    fn balance_of(&self, owner: &Address) -> u64;

    /// Total supply.
    fn total_supply(&self) -> u64;
}

/// Resolves ledger references to reachable ledgers - outbound port.
pub trait LedgerRegistry {
    /// Ledger for reads.
    fn ledger(&self, reference: &LedgerRef) -> Option<&dyn TokenLedger>;

    /// Ledger for transfers.
    fn ledger_mut(&mut self, reference: &LedgerRef) -> Option<&mut dyn TokenLedger>;

    /// Whether `reference` resolves.
    fn contains(&self, reference: &LedgerRef) -> bool {
        self.ledger(reference).is_some()
    }
}

/// Maps a credential to the caller's canonical address - outbound port.
pub trait IdentityResolver {
    /// Resolve the caller. Empty or malformed credentials are rejected.
    fn resolve(&self, credential: &Credential) -> Result<Address, SwapError>;
}

/// Key-value persistence of agreements - outbound port.
///
/// No delete: settled agreements remain as an audit record.
pub trait AgreementStore {
    /// Load an agreement.
    fn get(&self, id: &AgreementId) -> Result<Option<Agreement>, StoreError>;

    /// Store an agreement, overwriting any existing record.
    fn put(&mut self, id: &AgreementId, agreement: &Agreement) -> Result<(), StoreError>;

    /// Whether a record exists under `id`.
    fn contains(&self, id: &AgreementId) -> Result<bool, StoreError>;
}

/// Receives events raised during a call - outbound port.
pub trait EventEmitter {
    /// Record an event.
    fn emit(&mut self, event: SwapEvent);
}
