//! Configuration for the swap engine

use crate::domain::{Address, SwapError};
use serde::{Deserialize, Serialize};
use std::env;

/// Default contract name, and therefore custody address `cc:crosschainswap`.
pub const DEFAULT_CONTRACT_NAME: &str = "crosschainswap";

/// Swap engine configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapConfig {
    /// Name the engine is deployed under; custody address is `cc:<name>`
    pub contract_name: String,
    /// Upper bound on lock time in seconds, unbounded when `None`
    pub max_lock_time_secs: Option<u64>,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            contract_name: DEFAULT_CONTRACT_NAME.to_string(),
            max_lock_time_secs: None,
        }
    }
}

impl SwapConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `HTLC_CONTRACT_NAME`: Contract name (default: crosschainswap)
    /// - `HTLC_MAX_LOCK_TIME_SECS`: Maximum lock time (default: unbounded)
    pub fn from_env() -> Result<Self, SwapError> {
        let contract_name =
            env::var("HTLC_CONTRACT_NAME").unwrap_or_else(|_| DEFAULT_CONTRACT_NAME.to_string());

        let max_lock_time_secs = match env::var("HTLC_MAX_LOCK_TIME_SECS") {
            Ok(raw) => Some(parse_max_lock_time(&raw)?),
            Err(_) => None,
        };

        let config = Self {
            contract_name,
            max_lock_time_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), SwapError> {
        if self.contract_name.is_empty() {
            return Err(SwapError::invalid("contract_name", "must not be empty"));
        }
        if self.max_lock_time_secs == Some(0) {
            return Err(SwapError::invalid(
                "max_lock_time_secs",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Address holding locked tokens.
    pub fn custody_address(&self) -> Address {
        Address::custody(&self.contract_name)
    }
}

fn parse_max_lock_time(raw: &str) -> Result<u64, SwapError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| SwapError::invalid("max_lock_time_secs", e.to_string()))
}
