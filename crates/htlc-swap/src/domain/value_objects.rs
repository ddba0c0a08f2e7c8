//! # Domain Value Objects
//!
//! Immutable value types shared by the engine, the ports and the adapters.

use super::errors::{Hash, SwapError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Length of an account address in hex characters (SHA-256 digest).
pub const ACCOUNT_ADDRESS_LEN: usize = 64;

/// Prefix of addresses owned by a contract rather than a key holder.
pub const CUSTODY_PREFIX: &str = "cc:";

/// Canonical ledger address.
///
/// Two shapes exist:
/// - account addresses: 64 lower-case hex chars derived from a public key
/// - custody addresses: `cc:<contract name>`, held by a contract
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Parse a caller-supplied address. `field` names the argument in errors.
    pub fn parse(field: &'static str, value: &str) -> Result<Self, SwapError> {
        if value.is_empty() {
            return Err(SwapError::invalid(field, "address is empty"));
        }
        if let Some(name) = value.strip_prefix(CUSTODY_PREFIX) {
            if name.is_empty() {
                return Err(SwapError::invalid(field, "custody address has no contract name"));
            }
            return Ok(Self(value.to_string()));
        }
        if value.len() != ACCOUNT_ADDRESS_LEN || !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SwapError::invalid(
                field,
                format!("expected {} hex characters", ACCOUNT_ADDRESS_LEN),
            ));
        }
        Ok(Self(value.to_ascii_lowercase()))
    }

    /// Account address for a public-key digest.
    pub fn from_digest(digest: &Hash) -> Self {
        Self(hex::encode(digest))
    }

    /// Custody address of a contract.
    pub fn custody(contract_name: &str) -> Self {
        Self(format!("{}{}", CUSTODY_PREFIX, contract_name))
    }

    /// Whether this address belongs to a contract.
    pub fn is_custody(&self) -> bool {
        self.0.starts_with(CUSTODY_PREFIX)
    }

    /// Borrow as string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a swap agreement (hex SHA-256).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgreementId(String);

impl AgreementId {
    /// Identifier for a derived digest.
    pub fn from_digest(digest: &Hash) -> Self {
        Self(hex::encode(digest))
    }

    /// Borrow as string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AgreementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AgreementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for AgreementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of the token contract an agreement moves funds on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerRef(String);

impl LedgerRef {
    /// Create a ledger reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow as string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LedgerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Preimage that unlocks a claim.
///
/// Kept private until the counterparty claims; the claim publishes it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wrap a secret.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Bytes that are hashed into the image.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Borrow as string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the actual secret
        f.write_str("Secret(***)")
    }
}

/// SHA-256 image of a secret. Hex encoded on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Image(Hash);

impl Image {
    /// Wrap a digest.
    pub fn new(digest: Hash) -> Self {
        Self(digest)
    }

    /// Parse a 64 char hex digest.
    pub fn from_hex(value: &str) -> Result<Self, SwapError> {
        let bytes =
            hex::decode(value).map_err(|e| SwapError::invalid("image", e.to_string()))?;
        let digest: Hash = bytes
            .try_into()
            .map_err(|_| SwapError::invalid("image", "expected a 32 byte SHA-256 digest"))?;
        Ok(Self(digest))
    }

    /// Digest bytes.
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }

    /// Hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Image({})", self.to_hex())
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Image {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Image {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Image::from_hex(&value).map_err(serde::de::Error::custom)
    }
}

/// Credential presented by the invoker of a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Raw public key bytes, as used for transaction authorization.
    #[serde(with = "hex::serde")]
    pub public_key: Vec<u8>,
}

impl Credential {
    /// Credential for a public key.
    pub fn new(public_key: impl Into<Vec<u8>>) -> Self {
        Self {
            public_key: public_key.into(),
        }
    }
}

/// Authoritative transaction data supplied by the hosting ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxInfo {
    /// Ledger transaction identifier, unique across the ledger's history.
    pub tx_id: String,
    /// Transaction timestamp in seconds.
    pub timestamp: u64,
}

impl TxInfo {
    /// Create transaction info.
    pub fn new(tx_id: impl Into<String>, timestamp: u64) -> Self {
        Self {
            tx_id: tx_id.into(),
            timestamp,
        }
    }
}

/// Everything an operation knows about its invocation.
///
/// Passed explicitly to every call; nothing about the caller is global.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    /// Credential of the invoker.
    pub credential: Credential,
    /// Transaction the invocation executes in.
    pub tx: TxInfo,
}

impl RequestContext {
    /// Create a request context.
    pub fn new(credential: Credential, tx: TxInfo) -> Self {
        Self { credential, tx }
    }

    /// Authoritative time of this invocation.
    pub fn now(&self) -> u64 {
        self.tx.timestamp
    }
}

/// Agreement state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgreementStatus {
    /// Funds in custody, awaiting claim or expiry.
    Locked,
    /// Funds returned to the owner after expiry.
    Unlocked,
    /// Funds released to the counterparty against the secret.
    Claimed,
}

impl AgreementStatus {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: AgreementStatus) -> bool {
        matches!(
            (self, next),
            (Self::Locked, Self::Unlocked) | (Self::Locked, Self::Claimed)
        )
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Unlocked | Self::Claimed)
    }
}

impl fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Locked => "Locked",
            Self::Unlocked => "Unlocked",
            Self::Claimed => "Claimed",
        };
        f.write_str(name)
    }
}

/// Party of an agreement a guard requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Party {
    /// Creator of the lock.
    Owner,
    /// Recipient on a successful claim.
    Counterparty,
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => f.write_str("owner"),
            Self::Counterparty => f.write_str("counterparty"),
        }
    }
}
