//! Reference fungible token ledger.
//!
//! Whole-unit token (zero decimals) whose entire supply is credited to one
//! account at creation. Each account carries an available balance and the
//! approvals it has granted to spenders.

use crate::domain::{Address, LedgerError, LedgerRef};
use crate::ports::{LedgerRegistry, TokenLedger};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Token metadata
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub symbol: String,
    pub name: String,
    /// Always zero
    pub decimals: u8,
    pub supply: u64,
}

/// Per-account ledger entry
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub available: u64,
    /// spender -> approved amount
    pub approved: BTreeMap<Address, u64>,
}

/// In-memory fungible token.
#[derive(Clone, Debug)]
pub struct FungibleToken {
    metadata: TokenMetadata,
    accounts: BTreeMap<Address, AccountBalance>,
}

impl FungibleToken {
    /// Create a token and credit `supply` to `initial_owner`.
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        supply: u64,
        initial_owner: &Address,
    ) -> Self {
        let mut accounts = BTreeMap::new();
        accounts.insert(
            initial_owner.clone(),
            AccountBalance {
                available: supply,
                approved: BTreeMap::new(),
            },
        );
        Self {
            metadata: TokenMetadata {
                symbol: symbol.into(),
                name: name.into(),
                decimals: 0,
                supply,
            },
            accounts,
        }
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    fn available(&self, owner: &Address) -> u64 {
        self.accounts.get(owner).map(|a| a.available).unwrap_or(0)
    }

    /// Debit `from` and credit `to`. Balances are checked before either side
    /// changes.
    fn move_balance(&mut self, from: &Address, to: &Address, amount: u64) -> Result<(), LedgerError> {
        let available = self.available(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                account: from.clone(),
                available,
                required: amount,
            });
        }
        if from == to {
            return Ok(());
        }
        let credited = self
            .available(to)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Overflow(to.clone()))?;

        self.accounts.entry(from.clone()).or_default().available = available - amount;
        self.accounts.entry(to.clone()).or_default().available = credited;
        Ok(())
    }
}

impl TokenLedger for FungibleToken {
    fn transfer(&mut self, sender: &Address, to: &Address, amount: u64) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        self.move_balance(sender, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let approved = self.allowance(from, spender);
        if approved < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner: from.clone(),
                spender: spender.clone(),
                approved,
                required: amount,
            });
        }

        self.move_balance(from, to, amount)?;

        let entry = self.accounts.entry(from.clone()).or_default();
        entry.approved.insert(spender.clone(), approved - amount);
        Ok(())
    }

    fn approve(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        self.accounts
            .entry(owner.clone())
            .or_default()
            .approved
            .insert(spender.clone(), amount);
        Ok(())
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> u64 {
        self.accounts
            .get(owner)
            .and_then(|a| a.approved.get(spender))
            .copied()
            .unwrap_or(0)
    }

    fn balance_of(&self, owner: &Address) -> u64 {
        self.available(owner)
    }

    fn total_supply(&self) -> u64 {
        self.metadata.supply
    }
}

/// In-memory implementation of LedgerRegistry.
#[derive(Clone, Debug, Default)]
pub struct InMemoryLedgerRegistry {
    ledgers: HashMap<LedgerRef, FungibleToken>,
}

impl InMemoryLedgerRegistry {
    /// Register a token under `reference`, returning any token it replaces.
    pub fn register(&mut self, reference: LedgerRef, token: FungibleToken) -> Option<FungibleToken> {
        self.ledgers.insert(reference, token)
    }

    pub fn token(&self, reference: &LedgerRef) -> Option<&FungibleToken> {
        self.ledgers.get(reference)
    }

    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }
}

impl LedgerRegistry for InMemoryLedgerRegistry {
    fn ledger(&self, reference: &LedgerRef) -> Option<&dyn TokenLedger> {
        self.ledgers.get(reference).map(|t| t as &dyn TokenLedger)
    }

    fn ledger_mut(&mut self, reference: &LedgerRef) -> Option<&mut dyn TokenLedger> {
        self.ledgers
            .get_mut(reference)
            .map(|t| t as &mut dyn TokenLedger)
    }
}
