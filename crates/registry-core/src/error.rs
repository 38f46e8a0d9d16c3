//! Error kinds surfaced by registry operations.

use alloy_primitives::U256;
use registry_contract::ContractError;
use registry_delivery::DeliveryError;
use serde::Serialize;
use thiserror::Error;

/// Errors returned by [`crate::RegistryService`] operations.
///
/// Provider and contract errors are translated into one of these kinds at
/// each operation boundary; the message keeps the underlying detail.
#[derive(Debug, Error)]
pub enum RegistryError {
	/// Input rejected before any contract interaction.
	#[error("Validation error: {0}")]
	Validation(String),
	/// Submission failed or the transaction reverted.
	#[error("Transaction failed: {0}")]
	TransactionFailed(String),
	/// The transaction was submitted but not confirmed in time.
	#[error("Transaction {hash} not confirmed within {timeout_secs}s")]
	ConfirmationTimeout { hash: String, timeout_secs: u64 },
	#[error("Not found: {0}")]
	RecordNotFound(String),
	/// A read failed for a reason other than the record being absent.
	#[error("Read failed: {0}")]
	ReadFailed(String),
	/// Startup configuration is missing or inconsistent with the contract.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

impl RegistryError {
	/// Stable name of the error kind, used in machine-readable output.
	pub fn kind(&self) -> &'static str {
		match self {
			RegistryError::Validation(_) => "ValidationError",
			RegistryError::TransactionFailed(_) => "TransactionFailed",
			RegistryError::ConfirmationTimeout { .. } => "ConfirmationTimeout",
			RegistryError::RecordNotFound(_) => "RecordNotFound",
			RegistryError::ReadFailed(_) => "ReadFailed",
			RegistryError::Configuration(_) => "ConfigurationError",
		}
	}

	/// Translates a failure while submitting or confirming a transaction.
	pub fn from_write(err: ContractError) -> Self {
		match err {
			ContractError::Delivery(DeliveryError::ConfirmationTimeout { hash, timeout_secs }) => {
				RegistryError::ConfirmationTimeout { hash, timeout_secs }
			},
			other @ ContractError::UnknownFunction(_) => {
				RegistryError::Configuration(other.to_string())
			},
			other => RegistryError::TransactionFailed(other.to_string()),
		}
	}

	/// Translates a failure of a read-only call.
	pub fn from_read(err: ContractError) -> Self {
		match err {
			other @ ContractError::UnknownFunction(_) => {
				RegistryError::Configuration(other.to_string())
			},
			other => RegistryError::ReadFailed(other.to_string()),
		}
	}
}

/// One index the indexed reader could not read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedIndex {
	pub index: u64,
	pub reason: String,
}

/// A listing that completed with some indices missing.
///
/// Never returned as an error: the listing still succeeds with the records
/// that could be read, and this is logged and exposed on the report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("listing read {read} of {total} services, skipped indices {indices:?}")]
pub struct PartialEnumerationFailure {
	pub total: U256,
	pub read: usize,
	pub indices: Vec<u64>,
}
