//! IPC Handler for the swap engine
//!
//! Converts raw payload arguments into domain types and routes each closed
//! operation variant to the engine or to a token ledger.

use crate::application::SwapEngine;
use crate::domain::{
    Address, AgreementId, ApprovedEvent, Image, LedgerRef, RequestContext, SwapError, SwapEvent,
    TransferredEvent,
};
use crate::ipc::payloads::{
    AllowanceArgs, ApproveArgs, BalanceOfArgs, Call, InvocationResponse, LockArgs, SwapOperation,
    TokenOperation, TransferArgs, TransferFromArgs,
};
use crate::ports::inbound::{LockRequest, SwapApi};
use crate::ports::outbound::{
    AgreementStore, EventEmitter, IdentityResolver, LedgerRegistry, TokenLedger,
};
use htlc_telemetry::log_ledger_event;
use tracing::debug;

const COMPONENT: &str = "token";

/// Route a call to the engine or a ledger.
pub fn dispatch<S, R, I, E>(
    engine: &mut SwapEngine<S, R, I, E>,
    ctx: &RequestContext,
    call: Call,
) -> Result<InvocationResponse, SwapError>
where
    S: AgreementStore,
    R: LedgerRegistry,
    I: IdentityResolver,
    E: EventEmitter,
{
    match call {
        Call::Swap(op) => dispatch_swap(engine, ctx, op),
        Call::Token { ledger, op } => dispatch_token(engine, ctx, &ledger, op),
    }
}

/// Run a swap operation.
pub fn dispatch_swap<S, R, I, E>(
    engine: &mut SwapEngine<S, R, I, E>,
    ctx: &RequestContext,
    op: SwapOperation,
) -> Result<InvocationResponse, SwapError>
where
    S: AgreementStore,
    R: LedgerRegistry,
    I: IdentityResolver,
    E: EventEmitter,
{
    match op {
        SwapOperation::Lock(args) => {
            let request = parse_lock_args(&args)?;
            engine
                .lock(ctx, request)
                .map(InvocationResponse::AgreementId)
        }
        SwapOperation::Unlock(args) => {
            check_agreement_id(&args.agreement_id)?;
            engine.unlock(ctx, &args.agreement_id)?;
            Ok(InvocationResponse::Empty)
        }
        SwapOperation::Claim(args) => {
            check_agreement_id(&args.agreement_id)?;
            engine.claim(ctx, &args.agreement_id, args.secret)?;
            Ok(InvocationResponse::Empty)
        }
        SwapOperation::Query(args) => {
            check_agreement_id(&args.agreement_id)?;
            engine
                .agreement(&args.agreement_id)
                .map(InvocationResponse::Agreement)
        }
    }
}

/// Run a token operation against a registered ledger.
pub fn dispatch_token<S, R, I, E>(
    engine: &mut SwapEngine<S, R, I, E>,
    ctx: &RequestContext,
    reference: &LedgerRef,
    op: TokenOperation,
) -> Result<InvocationResponse, SwapError>
where
    S: AgreementStore,
    R: LedgerRegistry,
    I: IdentityResolver,
    E: EventEmitter,
{
    let ledger_error = |source| SwapError::LedgerTransfer {
        ledger: reference.clone(),
        source,
    };

    match op {
        TokenOperation::Transfer(TransferArgs { to, amount }) => {
            let invoker = engine.caller(ctx)?;
            let to = Address::parse("to", &to)?;
            let amount = parse_u64("amount", &amount)?;
            ledger_mut(engine, reference)?
                .transfer(&invoker, &to, amount)
                .map_err(ledger_error)?;
            log_ledger_event!(
                debug,
                COMPONENT,
                "[htlc] Transferred tokens",
                reference,
                from = %invoker,
                to = %to,
                amount
            );
            engine.emit(SwapEvent::Transferred(TransferredEvent {
                ledger: reference.clone(),
                from: invoker,
                to,
                amount,
            }));
            Ok(InvocationResponse::Empty)
        }
        TokenOperation::TransferFrom(TransferFromArgs { from, to, amount }) => {
            let invoker = engine.caller(ctx)?;
            let from = Address::parse("from", &from)?;
            let to = Address::parse("to", &to)?;
            let amount = parse_u64("amount", &amount)?;
            ledger_mut(engine, reference)?
                .transfer_from(&invoker, &from, &to, amount)
                .map_err(ledger_error)?;
            log_ledger_event!(
                debug,
                COMPONENT,
                "[htlc] Transferred tokens on allowance",
                reference,
                spender = %invoker,
                from = %from,
                to = %to,
                amount
            );
            engine.emit(SwapEvent::Transferred(TransferredEvent {
                ledger: reference.clone(),
                from,
                to,
                amount,
            }));
            Ok(InvocationResponse::Empty)
        }
        TokenOperation::Approve(ApproveArgs { spender, amount }) => {
            let invoker = engine.caller(ctx)?;
            let spender = Address::parse("spender", &spender)?;
            let amount = parse_u64("amount", &amount)?;
            ledger_mut(engine, reference)?
                .approve(&invoker, &spender, amount)
                .map_err(ledger_error)?;
            log_ledger_event!(
                debug,
                COMPONENT,
                "[htlc] Approved spender",
                reference,
                owner = %invoker,
                spender = %spender,
                amount
            );
            engine.emit(SwapEvent::Approved(ApprovedEvent {
                ledger: reference.clone(),
                owner: invoker,
                spender,
                amount,
            }));
            Ok(InvocationResponse::Empty)
        }
        TokenOperation::Allowance(AllowanceArgs { owner, spender }) => {
            let owner = Address::parse("owner", &owner)?;
            let spender = Address::parse("spender", &spender)?;
            let ledger = ledger(engine, reference)?;
            Ok(InvocationResponse::Amount(ledger.allowance(&owner, &spender)))
        }
        TokenOperation::BalanceOf(BalanceOfArgs { owner }) => {
            let owner = Address::parse("owner", &owner)?;
            let ledger = ledger(engine, reference)?;
            Ok(InvocationResponse::Amount(ledger.balance_of(&owner)))
        }
        TokenOperation::TotalSupply => {
            let ledger = ledger(engine, reference)?;
            Ok(InvocationResponse::Amount(ledger.total_supply()))
        }
    }
}

fn ledger<'a, S, R, I, E>(
    engine: &'a SwapEngine<S, R, I, E>,
    reference: &LedgerRef,
) -> Result<&'a dyn TokenLedger, SwapError>
where
    S: AgreementStore,
    R: LedgerRegistry,
    I: IdentityResolver,
    E: EventEmitter,
{
    engine
        .ledgers()
        .ledger(reference)
        .ok_or_else(|| unknown_ledger(reference))
}

fn ledger_mut<'a, S, R, I, E>(
    engine: &'a mut SwapEngine<S, R, I, E>,
    reference: &LedgerRef,
) -> Result<&'a mut dyn TokenLedger, SwapError>
where
    S: AgreementStore,
    R: LedgerRegistry,
    I: IdentityResolver,
    E: EventEmitter,
{
    engine
        .ledgers_mut()
        .ledger_mut(reference)
        .ok_or_else(|| unknown_ledger(reference))
}

fn unknown_ledger(reference: &LedgerRef) -> SwapError {
    SwapError::invalid("ledger", format!("no ledger registered as {}", reference))
}

/// Parse Lock arguments, naming the offending field on failure.
pub fn parse_lock_args(args: &LockArgs) -> Result<LockRequest, SwapError> {
    let counterparty = Address::parse("counterparty", &args.counterparty)?;
    let image = Image::from_hex(&args.image)?;
    let amount = parse_u64("amount", &args.amount)?;
    if args.token_contract.is_empty() {
        return Err(SwapError::invalid("token_contract", "must not be empty"));
    }
    let lock_time = parse_u64("lock_time", &args.lock_time)?;

    debug!(
        counterparty = %counterparty,
        amount,
        lock_time,
        "[htlc] Parsed lock arguments"
    );

    Ok(LockRequest {
        counterparty,
        image,
        amount,
        token_contract: LedgerRef::new(args.token_contract.clone()),
        lock_time,
    })
}

fn parse_u64(field: &'static str, value: &str) -> Result<u64, SwapError> {
    value
        .parse::<u64>()
        .map_err(|e| SwapError::invalid(field, format!("{:?} is not an unsigned integer: {}", value, e)))
}

fn check_agreement_id(agreement_id: &AgreementId) -> Result<(), SwapError> {
    if agreement_id.as_str().is_empty() {
        return Err(SwapError::invalid("agreement_id", "must not be empty"));
    }
    Ok(())
}
