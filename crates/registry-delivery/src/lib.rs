//! Transaction delivery for the service registry bridge.
//!
//! The rest of the workspace never touches a provider directly. It hands a
//! [`Transaction`] to a [`DeliveryInterface`] and gets back hashes, receipts
//! or raw call output. [`DeliveryService`] wraps the selected implementation
//! together with the configured confirmation policy.

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use registry_types::{
	ConfigSchema, ImplementationRegistry, Transaction, TransactionHash, TransactionReceipt,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

/// Errors that can occur during transaction delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// The node rejected the call because contract execution reverted.
	#[error("Execution reverted: {0}")]
	Reverted(String),
	/// Inclusion was not observed within the configured time.
	#[error("Transaction {hash} not confirmed within {timeout_secs}s")]
	ConfirmationTimeout { hash: String, timeout_secs: u64 },
	/// The node does not know the transaction.
	#[error("Not found: {0}")]
	NotFound(String),
	/// The implementation's configuration table is invalid.
	#[error("Invalid configuration: {0}")]
	InvalidConfiguration(String),
}

/// Trait defining the interface for transaction delivery implementations.
#[async_trait]
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait DeliveryInterface: Send + Sync {
	/// Returns the configuration schema for this delivery implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Address of the account that signs submitted transactions.
	fn signer_address(&self) -> Address;

	/// Signs and submits a transaction, returning as soon as the node
	/// accepts it. Never retried.
	async fn submit(&self, tx: Transaction) -> Result<TransactionHash, DeliveryError>;

	/// Waits until the transaction has `confirmations` confirmations, or
	/// fails with [`DeliveryError::ConfirmationTimeout`] after `timeout`.
	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		confirmations: u64,
		timeout: Duration,
	) -> Result<TransactionReceipt, DeliveryError>;

	/// Retrieves the receipt for a transaction if it has been mined.
	async fn get_receipt(&self, hash: &TransactionHash) -> Result<TransactionReceipt, DeliveryError>;

	/// Executes a read-only call (`eth_call`) and returns the raw output.
	async fn eth_call(&self, tx: Transaction) -> Result<Bytes, DeliveryError>;
}

/// Type alias for delivery factory functions.
///
/// Receives the implementation's table from `[delivery.implementations]`.
pub type DeliveryFactory = fn(&toml::Value) -> Result<Box<dyn DeliveryInterface>, DeliveryError>;

/// Registry trait for delivery implementations.
pub trait DeliveryRegistry: ImplementationRegistry<Factory = DeliveryFactory> {}

/// Get all registered delivery implementations as (name, factory) pairs.
pub fn get_all_implementations() -> Vec<(&'static str, DeliveryFactory)> {
	use implementations::evm::alloy;

	vec![(alloy::Registry::NAME, alloy::Registry::factory())]
}

/// Builds the implementation registered under `name`.
pub fn create_delivery(
	name: &str,
	config: &toml::Value,
) -> Result<Box<dyn DeliveryInterface>, DeliveryError> {
	let factory = get_all_implementations()
		.into_iter()
		.find_map(|(registered, factory)| (registered == name).then_some(factory))
		.ok_or_else(|| {
			DeliveryError::InvalidConfiguration(format!("Unknown delivery implementation '{}'", name))
		})?;
	factory(config)
}

/// The selected delivery implementation plus the confirmation policy.
#[derive(Clone)]
pub struct DeliveryService {
	implementation: Arc<dyn DeliveryInterface>,
	confirmations: u64,
	confirmation_timeout: Duration,
}

impl std::fmt::Debug for DeliveryService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DeliveryService")
			.field("signer", &self.implementation.signer_address())
			.field("confirmations", &self.confirmations)
			.field("confirmation_timeout", &self.confirmation_timeout)
			.finish()
	}
}

impl DeliveryService {
	pub fn new(
		implementation: Arc<dyn DeliveryInterface>,
		confirmations: u64,
		confirmation_timeout_seconds: u64,
	) -> Self {
		Self {
			implementation,
			confirmations,
			confirmation_timeout: Duration::from_secs(confirmation_timeout_seconds),
		}
	}

	pub fn signer_address(&self) -> Address {
		self.implementation.signer_address()
	}

	/// Submits a transaction.
	pub async fn deliver(&self, tx: Transaction) -> Result<TransactionHash, DeliveryError> {
		self.implementation.submit(tx).await
	}

	/// Waits for the configured number of confirmations.
	pub async fn confirm(&self, hash: &TransactionHash) -> Result<TransactionReceipt, DeliveryError> {
		self.implementation
			.wait_for_confirmation(hash, self.confirmations, self.confirmation_timeout)
			.await
	}

	/// Executes a read-only contract call.
	pub async fn contract_call(&self, tx: Transaction) -> Result<Bytes, DeliveryError> {
		self.implementation.eth_call(tx).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use mockall::predicate::eq;
	use registry_types::TransactionReceiptBuilder;

	#[tokio::test]
	async fn test_confirm_uses_configured_policy() {
		let mut mock = MockDeliveryInterface::new();
		mock.expect_wait_for_confirmation()
			.withf(|_, confirmations, timeout| {
				*confirmations == 3 && *timeout == Duration::from_secs(30)
			})
			.times(1)
			.returning(|_, _, _| Box::pin(async { Ok(TransactionReceiptBuilder::new().build()) }));

		let service = DeliveryService::new(Arc::new(mock), 3, 30);
		let receipt = service.confirm(&TransactionHash(vec![0x11; 32])).await.unwrap();
		assert!(receipt.success);
	}

	#[tokio::test]
	async fn test_deliver_passes_transaction_through() {
		let tx = Transaction::call(Address::repeat_byte(0x22), vec![1, 2, 3, 4]);
		let mut mock = MockDeliveryInterface::new();
		mock.expect_submit()
			.with(eq(tx.clone()))
			.times(1)
			.returning(|_| Box::pin(async { Ok(TransactionHash(vec![0xab; 32])) }));

		let service = DeliveryService::new(Arc::new(mock), 1, 120);
		let hash = service.deliver(tx).await.unwrap();
		assert_eq!(hash.0, vec![0xab; 32]);
	}

	#[test]
	fn test_create_delivery_unknown_name() {
		let config = toml::Value::Table(toml::map::Map::new());
		let err = create_delivery("carrier_pigeon", &config).err().unwrap();
		assert!(matches!(err, DeliveryError::InvalidConfiguration(_)));
	}

	#[test]
	fn test_registered_implementations() {
		let names: Vec<_> = get_all_implementations()
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		assert_eq!(names, vec!["evm_alloy"]);
	}
}
