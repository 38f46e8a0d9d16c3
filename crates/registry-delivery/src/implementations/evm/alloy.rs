//! Alloy-based EVM delivery.
//!
//! One HTTP provider with a local private-key wallet. The transport retries
//! rate-limited requests with backoff; anything that reached execution is
//! reported as-is and never resent.

use crate::{DeliveryError, DeliveryInterface};
use alloy_network::EthereumWallet;
use alloy_primitives::{Address, Bytes, B256};
use alloy_provider::{
	DynProvider, PendingTransactionConfig, PendingTransactionError, Provider, ProviderBuilder,
	WatchTxError,
};
use alloy_rpc_client::RpcClient;
use alloy_rpc_types::TransactionRequest;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::{layers::RetryBackoffLayer, TransportError};
use async_trait::async_trait;
use registry_types::{
	ConfigSchema, Field, FieldType, Log, Schema, SecretString, Transaction as RegistryTransaction,
	TransactionHash, TransactionReceipt, ValidationError, H256,
};
use std::time::Duration;

/// JSON-RPC error code used by nodes for execution reverts.
const EXECUTION_REVERTED_CODE: i64 = 3;

const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// Alloy-based EVM delivery implementation.
pub struct AlloyDelivery {
	provider: DynProvider,
	signer_address: Address,
}

impl AlloyDelivery {
	/// Creates a delivery bound to `rpc_url`, signing with `signer`.
	///
	/// No request is made here; the first RPC call opens the connection.
	pub fn new(
		rpc_url: &str,
		signer: PrivateKeySigner,
		chain_id: Option<u64>,
		poll_interval: Duration,
	) -> Result<Self, DeliveryError> {
		let url = rpc_url
			.parse()
			.map_err(|e| DeliveryError::InvalidConfiguration(format!("Invalid RPC URL: {}", e)))?;

		let signer = signer.with_chain_id(chain_id);
		let signer_address = signer.address();
		let wallet = EthereumWallet::from(signer);

		let retry_layer = RetryBackoffLayer::new(
			5,    // max_retry
			1000, // initial backoff in milliseconds
			10,   // compute units per second
		);
		let client = RpcClient::builder().layer(retry_layer).http(url);

		let provider = ProviderBuilder::new()
			.wallet(wallet)
			.connect_client(client);
		provider.client().set_poll_interval(poll_interval);

		Ok(Self {
			provider: provider.erased(),
			signer_address,
		})
	}
}

/// Configuration schema for the `evm_alloy` implementation table.
pub struct AlloyDeliverySchema;

impl AlloyDeliverySchema {
	/// Static validation method for use before instance creation
	pub fn validate_config(config: &toml::Value) -> Result<(), ValidationError> {
		Self.validate(config)
	}
}

impl ConfigSchema for AlloyDeliverySchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![
				Field::new("rpc_url", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
							Ok(())
						},
						_ => Err("rpc_url must be an http(s) URL".to_string()),
					}
				}),
				Field::new("private_key", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some(key) if !key.trim().is_empty() => Ok(()),
						_ => Err("private_key cannot be empty".to_string()),
					}
				}),
			],
			vec![
				Field::new(
					"chain_id",
					FieldType::Integer {
						min: Some(1),
						max: None,
					},
				),
				Field::new(
					"poll_interval_ms",
					FieldType::Integer {
						min: Some(50),
						max: Some(60_000),
					},
				),
			],
		);

		schema.validate(config)
	}
}

/// Returns the revert reason if the node's error response describes a revert.
///
/// Custom errors arrive as ABI-encoded revert data, which is appended so the
/// caller sees it.
fn revert_reason(code: i64, message: &str, data: Option<&str>) -> Option<String> {
	if code != EXECUTION_REVERTED_CODE && !message.to_lowercase().contains("revert") {
		return None;
	}
	Some(match data {
		Some(data) if !data.is_empty() && data != "null" => format!("{} (data: {})", message, data),
		_ => message.to_string(),
	})
}

fn classify_transport_error(context: &str, error: TransportError) -> DeliveryError {
	if let Some(payload) = error.as_error_resp() {
		let data = payload.data.as_ref().map(|raw| raw.get());
		if let Some(reason) = revert_reason(payload.code, &payload.message, data) {
			return DeliveryError::Reverted(reason);
		}
	}
	DeliveryError::Network(format!("{}: {}", context, error))
}

fn hash_word(hash: &TransactionHash) -> Result<B256, DeliveryError> {
	hash.as_b256().ok_or_else(|| {
		DeliveryError::NotFound(format!("Malformed transaction hash {}", hash))
	})
}

#[async_trait]
impl DeliveryInterface for AlloyDelivery {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(AlloyDeliverySchema)
	}

	fn signer_address(&self) -> Address {
		self.signer_address
	}

	async fn submit(&self, tx: RegistryTransaction) -> Result<TransactionHash, DeliveryError> {
		let request: TransactionRequest = tx.into();

		tracing::debug!(
			to = ?request.to,
			data_len = request.input.input().map(|d| d.len()).unwrap_or(0),
			gas_limit = ?request.gas,
			"Sending transaction"
		);

		let pending_tx = self.provider.send_transaction(request).await.map_err(|e| {
			tracing::error!(error = %e, "Transaction submission failed");
			classify_transport_error("Failed to send transaction", e)
		})?;

		let hash = TransactionHash::from(*pending_tx.tx_hash());
		tracing::info!(tx_hash = %hash, "Transaction submitted");
		Ok(hash)
	}

	async fn wait_for_confirmation(
		&self,
		hash: &TransactionHash,
		confirmations: u64,
		timeout: Duration,
	) -> Result<TransactionReceipt, DeliveryError> {
		let tx_hash = hash_word(hash)?;
		let timeout_error = || DeliveryError::ConfirmationTimeout {
			hash: hash.to_string(),
			timeout_secs: timeout.as_secs(),
		};
		let map_watch_error = |e: PendingTransactionError| match e {
			PendingTransactionError::TxWatcher(WatchTxError::Timeout) => timeout_error(),
			other => DeliveryError::Network(format!("Transaction watch failed: {}", other)),
		};

		tracing::info!(
			tx_hash = %hash,
			confirmations,
			timeout_secs = timeout.as_secs(),
			"Waiting for confirmation"
		);

		let config = PendingTransactionConfig::new(tx_hash)
			.with_required_confirmations(confirmations)
			.with_timeout(Some(timeout));

		let pending_tx = self
			.provider
			.watch_pending_transaction(config)
			.await
			.map_err(map_watch_error)?;
		let confirmed_hash = pending_tx.await.map_err(map_watch_error)?;

		let receipt = self.get_receipt(&TransactionHash::from(confirmed_hash)).await?;
		tracing::info!(
			tx_hash = %hash,
			block_number = receipt.block_number,
			success = receipt.success,
			"Transaction confirmed"
		);
		Ok(receipt)
	}

	async fn get_receipt(&self, hash: &TransactionHash) -> Result<TransactionReceipt, DeliveryError> {
		let tx_hash = hash_word(hash)?;

		match self.provider.get_transaction_receipt(tx_hash).await {
			Ok(Some(receipt)) => {
				let logs = receipt
					.inner
					.logs()
					.iter()
					.map(|log| Log {
						address: log.address(),
						topics: log.topics().iter().map(|topic| H256(topic.0)).collect(),
						data: log.inner.data.data.to_vec(),
					})
					.collect();

				Ok(TransactionReceipt {
					hash: TransactionHash::from(receipt.transaction_hash),
					block_number: receipt.block_number.unwrap_or(0),
					success: receipt.status(),
					logs,
				})
			},
			Ok(None) => Err(DeliveryError::NotFound(format!(
				"Transaction {} not found",
				hash
			))),
			Err(e) => Err(DeliveryError::Network(format!(
				"Failed to get receipt for {}: {}",
				hash, e
			))),
		}
	}

	async fn eth_call(&self, tx: RegistryTransaction) -> Result<Bytes, DeliveryError> {
		let request: TransactionRequest = tx.into();
		self.provider
			.call(request)
			.await
			.map_err(|e| classify_transport_error("Contract call failed", e))
	}
}

/// Factory function to create an Alloy delivery from its configuration table.
///
/// Required fields: `rpc_url`, `private_key`. Optional: `chain_id`
/// (EIP-155 replay protection), `poll_interval_ms`.
pub fn create_http_delivery(config: &toml::Value) -> Result<Box<dyn DeliveryInterface>, DeliveryError> {
	AlloyDeliverySchema::validate_config(config)
		.map_err(|e| DeliveryError::InvalidConfiguration(e.to_string()))?;

	let rpc_url = config
		.get("rpc_url")
		.and_then(|v| v.as_str())
		.ok_or_else(|| DeliveryError::InvalidConfiguration("rpc_url is required".to_string()))?;

	let private_key = config
		.get("private_key")
		.and_then(|v| v.as_str())
		.map(SecretString::from)
		.ok_or_else(|| DeliveryError::InvalidConfiguration("private_key is required".to_string()))?;

	let signer: PrivateKeySigner = private_key.with_exposed(|key| {
		key.parse().map_err(|_| {
			DeliveryError::InvalidConfiguration("Invalid private key format".to_string())
		})
	})?;

	let chain_id = config
		.get("chain_id")
		.and_then(|v| v.as_integer())
		.map(|id| id as u64);

	let poll_interval_ms = config
		.get("poll_interval_ms")
		.and_then(|v| v.as_integer())
		.map(|ms| ms as u64)
		.unwrap_or(DEFAULT_POLL_INTERVAL_MS);

	let delivery = AlloyDelivery::new(
		rpc_url,
		signer,
		chain_id,
		Duration::from_millis(poll_interval_ms),
	)?;

	Ok(Box::new(delivery))
}

/// Registry for the HTTP/Alloy delivery implementation.
pub struct Registry;

impl registry_types::ImplementationRegistry for Registry {
	const NAME: &'static str = "evm_alloy";
	type Factory = crate::DeliveryFactory;

	fn factory() -> Self::Factory {
		create_http_delivery
	}
}

impl crate::DeliveryRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;

	// Well-known first development account.
	const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
	const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

	fn config_table(entries: &[(&str, toml::Value)]) -> toml::Value {
		let mut table = toml::map::Map::new();
		for (key, value) in entries {
			table.insert(key.to_string(), value.clone());
		}
		toml::Value::Table(table)
	}

	fn valid_config() -> toml::Value {
		config_table(&[
			("rpc_url", toml::Value::String("http://localhost:8545".into())),
			("private_key", toml::Value::String(TEST_KEY.into())),
			("chain_id", toml::Value::Integer(31337)),
		])
	}

	#[test]
	fn test_config_schema_validation_valid() {
		assert!(AlloyDeliverySchema.validate(&valid_config()).is_ok());
	}

	#[test]
	fn test_config_schema_rejects_non_http_url() {
		let config = config_table(&[
			("rpc_url", toml::Value::String("ws://localhost:8546".into())),
			("private_key", toml::Value::String(TEST_KEY.into())),
		]);
		let err = AlloyDeliverySchema.validate(&config).unwrap_err();
		assert!(err.to_string().contains("http(s) URL"));
	}

	#[test]
	fn test_config_schema_requires_private_key() {
		let config = config_table(&[(
			"rpc_url",
			toml::Value::String("http://localhost:8545".into()),
		)]);
		assert!(matches!(
			AlloyDeliverySchema.validate(&config),
			Err(ValidationError::MissingField(ref f)) if f == "private_key"
		));
	}

	#[tokio::test]
	async fn test_create_http_delivery_success() {
		let delivery = create_http_delivery(&valid_config()).unwrap();
		assert_eq!(delivery.signer_address().to_checksum(None), TEST_ADDRESS);
	}

	#[tokio::test]
	async fn test_create_http_delivery_bad_key() {
		let config = config_table(&[
			("rpc_url", toml::Value::String("http://localhost:8545".into())),
			("private_key", toml::Value::String("0xnothex".into())),
		]);
		let err = create_http_delivery(&config).err().unwrap();
		assert!(matches!(err, DeliveryError::InvalidConfiguration(_)));
	}

	#[test]
	fn test_revert_reason_detection() {
		assert_eq!(
			revert_reason(3, "execution reverted: status out of range", None).as_deref(),
			Some("execution reverted: status out of range")
		);
		assert_eq!(
			revert_reason(-32000, "execution reverted", Some("\"0x1234\"")).as_deref(),
			Some("execution reverted (data: \"0x1234\")")
		);
		assert!(revert_reason(-32000, "nonce too low", None).is_none());
		assert!(revert_reason(-32603, "insufficient funds for gas", None).is_none());
	}

	#[test]
	fn test_registry_name() {
		assert_eq!(
			<Registry as registry_types::ImplementationRegistry>::NAME,
			"evm_alloy"
		);
	}
}
