//! The registry contract as seen from the bridge.
//!
//! [`ContractAbi`] turns method names and dynamic values into calldata and
//! back, and decodes event logs. [`ContractClient`] pairs it with the
//! contract address and a delivery service.

mod abi;
mod client;
mod error;

pub use abi::{ContractAbi, DecodedLog};
pub use client::ContractClient;
pub use error::ContractError;

pub use alloy_dyn_abi::DynSolValue;
