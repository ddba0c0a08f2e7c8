//! Swap Engine Service
//!
//! Main service implementing SwapApi over the outbound ports.

use crate::algorithms::{derive_agreement_id, AgreementIdInput};
use crate::config::SwapConfig;
use crate::domain::{
    invariant_authorized, invariant_distinct_parties, invariant_expired, invariant_locked,
    invariant_lock_time, invariant_positive_amount, invariant_secret_matches,
    invariant_unexpired, Address, Agreement, AgreementId, AgreementParams, AgreementStatus,
    ClaimedEvent, LedgerRef, LockedEvent, Party, RequestContext, Secret, SwapError, SwapEvent,
    UnlockedEvent,
};
use crate::ports::inbound::{LockRequest, SwapApi};
use crate::ports::outbound::{
    AgreementStore, EventEmitter, IdentityResolver, LedgerRegistry, TokenLedger,
};
use htlc_telemetry::log_agreement_event;
use tracing::debug;

const COMPONENT: &str = "engine";

/// Swap Engine
///
/// Orchestrates each operation:
/// 1. Validate arguments and resolve the caller
/// 2. Check the agreement's state, party and timing guards
/// 3. Move tokens on the agreement's ledger
/// 4. Persist the agreement
/// 5. Emit the event
///
/// Every step either succeeds or returns before any later step runs. A
/// ledger failure therefore never leaves a stored or settled agreement
/// behind. Committing or discarding the ports' state as a whole is the
/// host's job.
pub struct SwapEngine<S, R, I, E> {
    config: SwapConfig,
    custody: Address,
    store: S,
    ledgers: R,
    identity: I,
    events: E,
}

impl<S, R, I, E> SwapEngine<S, R, I, E>
where
    S: AgreementStore,
    R: LedgerRegistry,
    I: IdentityResolver,
    E: EventEmitter,
{
    /// Create an engine over the given ports.
    pub fn new(config: SwapConfig, store: S, ledgers: R, identity: I, events: E) -> Self {
        let custody = config.custody_address();
        Self {
            config,
            custody,
            store,
            ledgers,
            identity,
            events,
        }
    }

    /// Release the stateful ports.
    pub fn into_parts(self) -> (S, R, E) {
        (self.store, self.ledgers, self.events)
    }

    /// Address holding locked tokens.
    pub fn custody_address(&self) -> &Address {
        &self.custody
    }

    /// Engine configuration.
    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    /// Agreement store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ledger registry.
    pub fn ledgers(&self) -> &R {
        &self.ledgers
    }

    /// Ledger registry, for direct token calls.
    pub fn ledgers_mut(&mut self) -> &mut R {
        &mut self.ledgers
    }

    /// Events emitted so far.
    pub fn events(&self) -> &E {
        &self.events
    }

    /// Record an event raised outside the swap operations.
    pub(crate) fn emit(&mut self, event: SwapEvent) {
        self.events.emit(event);
    }

    /// Resolve the caller of a request.
    pub fn caller(&self, ctx: &RequestContext) -> Result<Address, SwapError> {
        self.identity.resolve(&ctx.credential)
    }

    fn load(&self, agreement_id: &AgreementId) -> Result<Agreement, SwapError> {
        self.store
            .get(agreement_id)?
            .ok_or_else(|| SwapError::NotFound(agreement_id.clone()))
    }

    fn ledger_mut(&mut self, reference: &LedgerRef) -> Result<&mut dyn TokenLedger, SwapError> {
        self.ledgers
            .ledger_mut(reference)
            .ok_or_else(|| unreachable_ledger(reference))
    }

    /// Move an agreement's amount out of custody and record the terminal
    /// status.
    fn release(
        &mut self,
        mut agreement: Agreement,
        recipient: &Address,
        status: AgreementStatus,
    ) -> Result<Agreement, SwapError> {
        agreement.settle(status)?;

        let custody = self.custody.clone();
        self.ledger_mut(&agreement.token_contract)?
            .transfer(&custody, recipient, agreement.amount)
            .map_err(|source| SwapError::LedgerTransfer {
                ledger: agreement.token_contract.clone(),
                source,
            })?;

        self.store.put(&agreement.agreement_id, &agreement)?;
        Ok(agreement)
    }
}

fn unreachable_ledger(reference: &LedgerRef) -> SwapError {
    SwapError::invalid(
        "token_contract",
        format!("ledger {} is not reachable", reference),
    )
}

impl<S, R, I, E> SwapApi for SwapEngine<S, R, I, E>
where
    S: AgreementStore,
    R: LedgerRegistry,
    I: IdentityResolver,
    E: EventEmitter,
{
    fn lock(
        &mut self,
        ctx: &RequestContext,
        request: LockRequest,
    ) -> Result<AgreementId, SwapError> {
        let now = ctx.now();

        // 1. Validate arguments
        invariant_positive_amount(request.amount)?;
        let expiry = invariant_lock_time(now, request.lock_time, self.config.max_lock_time_secs)?;
        if !self.ledgers.contains(&request.token_contract) {
            return Err(unreachable_ledger(&request.token_contract));
        }

        // 2. Resolve owner and check the parties
        let owner = self.caller(ctx)?;
        invariant_distinct_parties(&owner, &request.counterparty)?;

        // 3. Derive the ID and reject duplicates
        let agreement_id = derive_agreement_id(&AgreementIdInput {
            tx_id: &ctx.tx.tx_id,
            owner: &owner,
            counterparty: &request.counterparty,
            timestamp: now,
            image: &request.image,
        });
        if self.store.contains(&agreement_id)? {
            return Err(SwapError::DuplicateAgreement(agreement_id));
        }

        debug!(
            agreement_id = %agreement_id,
            owner = %owner,
            expiry,
            "[htlc] Lock guards passed"
        );

        // 4. Pull the owner's tokens into custody
        let custody = self.custody.clone();
        self.ledger_mut(&request.token_contract)?
            .transfer_from(&custody, &owner, &custody, request.amount)
            .map_err(|source| SwapError::LedgerTransfer {
                ledger: request.token_contract.clone(),
                source,
            })?;

        // 5. Persist
        let agreement = Agreement::new(AgreementParams {
            agreement_id: agreement_id.clone(),
            owner: owner.clone(),
            counterparty: request.counterparty.clone(),
            image: request.image,
            amount: request.amount,
            token_contract: request.token_contract,
            expiry,
        });
        self.store.put(&agreement_id, &agreement)?;

        // 6. Emit
        self.events.emit(SwapEvent::Locked(LockedEvent {
            agreement_id: agreement_id.clone(),
            owner: owner.clone(),
            counterparty: request.counterparty,
            image: request.image,
            amount: request.amount,
            expiry,
        }));

        log_agreement_event!(
            info,
            COMPONENT,
            "[htlc] Locked tokens in custody",
            agreement_id,
            owner = %owner,
            amount = request.amount,
            expiry
        );

        Ok(agreement_id)
    }

    fn unlock(
        &mut self,
        ctx: &RequestContext,
        agreement_id: &AgreementId,
    ) -> Result<(), SwapError> {
        let now = ctx.now();
        let agreement = self.load(agreement_id)?;
        invariant_locked(&agreement)?;

        let caller = self.caller(ctx)?;
        invariant_authorized(&agreement, &caller, Party::Owner)?;
        invariant_expired(&agreement, now)?;

        debug!(
            agreement_id = %agreement_id,
            expiry = agreement.expiry,
            now,
            "[htlc] Unlock guards passed"
        );

        let owner = agreement.owner.clone();
        let agreement = self.release(agreement, &owner, AgreementStatus::Unlocked)?;

        self.events.emit(SwapEvent::Unlocked(UnlockedEvent {
            agreement_id: agreement_id.clone(),
        }));

        log_agreement_event!(
            info,
            COMPONENT,
            "[htlc] Unlocked tokens back to owner",
            agreement_id,
            owner = %owner,
            amount = agreement.amount
        );

        Ok(())
    }

    fn claim(
        &mut self,
        ctx: &RequestContext,
        agreement_id: &AgreementId,
        secret: Secret,
    ) -> Result<(), SwapError> {
        let now = ctx.now();
        let agreement = self.load(agreement_id)?;
        invariant_locked(&agreement)?;

        let caller = self.caller(ctx)?;
        invariant_authorized(&agreement, &caller, Party::Counterparty)?;
        invariant_unexpired(&agreement, now)?;
        invariant_secret_matches(&agreement, &secret)?;

        debug!(
            agreement_id = %agreement_id,
            expiry = agreement.expiry,
            now,
            "[htlc] Claim guards passed"
        );

        let counterparty = agreement.counterparty.clone();
        let agreement = self.release(agreement, &counterparty, AgreementStatus::Claimed)?;

        self.events.emit(SwapEvent::Claimed(ClaimedEvent {
            agreement_id: agreement_id.clone(),
            secret,
        }));

        log_agreement_event!(
            info,
            COMPONENT,
            "[htlc] Claimed tokens for counterparty",
            agreement_id,
            counterparty = %counterparty,
            amount = agreement.amount
        );

        Ok(())
    }

    fn agreement(&self, agreement_id: &AgreementId) -> Result<Agreement, SwapError> {
        self.load(agreement_id)
    }
}
