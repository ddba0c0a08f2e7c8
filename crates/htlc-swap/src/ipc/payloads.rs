//! IPC Payloads for the swap engine
//!
//! Requests name their operation in a `function` tag and carry raw string
//! arguments in `args`, the way ledger transactions submit them. Parsing
//! into domain types happens in the handler so errors can name the field.
//!
//! Caller identity is never a payload field. It travels in the
//! `RequestContext` next to the call.

use crate::domain::{Agreement, AgreementId, LedgerRef, RequestContext, Secret};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================
// INCOMING REQUESTS
// ============================================================

/// Arguments of `Lock`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockArgs {
    /// Counterparty account address (64 hex chars)
    pub counterparty: String,
    /// Hex SHA-256 image of the secret
    pub image: String,
    /// Decimal amount
    pub amount: String,
    /// Token contract name
    pub token_contract: String,
    /// Decimal lock time in seconds
    pub lock_time: String,
}

/// Arguments naming one agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementArgs {
    pub agreement_id: AgreementId,
}

/// Arguments of `Claim`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimArgs {
    pub agreement_id: AgreementId,
    pub secret: Secret,
}

/// Swap operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "function", content = "args")]
pub enum SwapOperation {
    Lock(LockArgs),
    Unlock(AgreementArgs),
    Claim(ClaimArgs),
    Query(AgreementArgs),
}

/// Arguments of `Transfer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferArgs {
    pub to: String,
    pub amount: String,
}

/// Arguments of `TransferFrom`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFromArgs {
    pub from: String,
    pub to: String,
    pub amount: String,
}

/// Arguments of `Approve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveArgs {
    pub spender: String,
    pub amount: String,
}

/// Arguments of `Allowance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceArgs {
    pub owner: String,
    pub spender: String,
}

/// Arguments of `BalanceOf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceOfArgs {
    pub owner: String,
}

/// Token ledger operations. The caller is the invoker of mutating ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "function", content = "args")]
pub enum TokenOperation {
    Transfer(TransferArgs),
    TransferFrom(TransferFromArgs),
    Approve(ApproveArgs),
    Allowance(AllowanceArgs),
    BalanceOf(BalanceOfArgs),
    TotalSupply,
}

/// Target of an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Call {
    /// Call into the swap engine.
    Swap(SwapOperation),
    /// Call into a registered token ledger.
    Token {
        ledger: LedgerRef,
        op: TokenOperation,
    },
}

impl Call {
    /// Operation name used in logs and metrics.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Swap(SwapOperation::Lock(_)) => "Lock",
            Self::Swap(SwapOperation::Unlock(_)) => "Unlock",
            Self::Swap(SwapOperation::Claim(_)) => "Claim",
            Self::Swap(SwapOperation::Query(_)) => "Query",
            Self::Token { op, .. } => match op {
                TokenOperation::Transfer(_) => "Transfer",
                TokenOperation::TransferFrom(_) => "TransferFrom",
                TokenOperation::Approve(_) => "Approve",
                TokenOperation::Allowance(_) => "Allowance",
                TokenOperation::BalanceOf(_) => "BalanceOf",
                TokenOperation::TotalSupply => "TotalSupply",
            },
        }
    }
}

/// One transaction submitted to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    /// Correlation ID for log and event tracking
    pub correlation_id: Uuid,
    /// Caller credential and authoritative transaction info
    pub context: RequestContext,
    /// Operation to run
    pub call: Call,
}

impl Invocation {
    /// Create an invocation with a fresh correlation ID.
    pub fn new(context: RequestContext, call: Call) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            context,
            call,
        }
    }

    /// Invocation of a swap operation.
    pub fn swap(context: RequestContext, op: SwapOperation) -> Self {
        Self::new(context, Call::Swap(op))
    }

    /// Invocation of a token operation.
    pub fn token(context: RequestContext, ledger: LedgerRef, op: TokenOperation) -> Self {
        Self::new(context, Call::Token { ledger, op })
    }
}

// ============================================================
// OUTGOING RESPONSES
// ============================================================

/// Result of a successful invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum InvocationResponse {
    /// New agreement from `Lock`
    AgreementId(AgreementId),
    /// Stored agreement from `Query`
    Agreement(Agreement),
    /// Token amount from read operations
    Amount(u64),
    /// No return value
    Empty,
}
