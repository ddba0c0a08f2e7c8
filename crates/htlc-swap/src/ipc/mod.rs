//! IPC Module for the swap engine
//!
//! Closed operation set submitted to the host:
//! - Swap: `Lock`, `Unlock`, `Claim`, `Query`
//! - Token: `Transfer`, `TransferFrom`, `Approve`, `Allowance`, `BalanceOf`, `TotalSupply`

pub mod handler;
pub mod payloads;

pub use handler::{dispatch, dispatch_swap, dispatch_token, parse_lock_args};
pub use payloads::*;
