//! Typed handle to the deployed registry contract.

use crate::{ContractAbi, ContractError};
use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, Bytes, U256};
use registry_delivery::DeliveryService;
use registry_types::{RawRecord, Transaction, TransactionHash, TransactionReceipt};
use std::sync::Arc;

/// Address, ABI and delivery for the one contract the bridge talks to.
///
/// Built once at startup and shared; all methods take `&self`.
#[derive(Debug, Clone)]
pub struct ContractClient {
	address: Address,
	abi: Arc<ContractAbi>,
	delivery: DeliveryService,
}

impl ContractClient {
	pub fn new(address: Address, abi: Arc<ContractAbi>, delivery: DeliveryService) -> Self {
		Self {
			address,
			abi,
			delivery,
		}
	}

	pub fn address(&self) -> Address {
		self.address
	}

	pub fn abi(&self) -> &ContractAbi {
		&self.abi
	}

	/// Address that signs submitted transactions.
	pub fn signer_address(&self) -> Address {
		self.delivery.signer_address()
	}

	/// Whether the ABI declares `method`.
	pub fn supports(&self, method: &str) -> bool {
		self.abi.has_function(method)
	}

	/// Encodes and submits a state-changing call.
	pub async fn submit(
		&self,
		method: &str,
		args: &[DynSolValue],
	) -> Result<TransactionHash, ContractError> {
		let data = self.abi.encode_call(method, args)?;
		tracing::debug!(method, contract = %self.address, "Submitting contract call");
		let hash = self
			.delivery
			.deliver(Transaction::call(self.address, data))
			.await?;
		Ok(hash)
	}

	/// Waits for the configured confirmations of a submitted call.
	pub async fn wait_for_receipt(
		&self,
		hash: &TransactionHash,
	) -> Result<TransactionReceipt, ContractError> {
		Ok(self.delivery.confirm(hash).await?)
	}

	/// Executes a read-only call and returns the raw output.
	pub async fn view(&self, method: &str, args: &[DynSolValue]) -> Result<Bytes, ContractError> {
		let data = self.abi.encode_call(method, args)?;
		let output = self
			.delivery
			.contract_call(Transaction::call(self.address, data))
			.await?;
		Ok(output)
	}

	pub async fn view_record(
		&self,
		method: &str,
		args: &[DynSolValue],
	) -> Result<RawRecord, ContractError> {
		let output = self.view(method, args).await?;
		self.abi.decode_record(method, &output)
	}

	pub async fn view_records(
		&self,
		method: &str,
		args: &[DynSolValue],
	) -> Result<Vec<RawRecord>, ContractError> {
		let output = self.view(method, args).await?;
		self.abi.decode_records(method, &output)
	}

	pub async fn view_uint(&self, method: &str, args: &[DynSolValue]) -> Result<U256, ContractError> {
		let output = self.view(method, args).await?;
		self.abi.decode_uint(method, &output)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use registry_delivery::{DeliveryError, MockDeliveryInterface};
	use registry_types::TransactionReceiptBuilder;

	const REGISTRY_ABI: &str = include_str!("../tests/fixtures/registry_abi.json");

	fn client(mock: MockDeliveryInterface) -> ContractClient {
		let abi = Arc::new(ContractAbi::from_json_str(REGISTRY_ABI).unwrap());
		ContractClient::new(
			Address::repeat_byte(0xcc),
			abi,
			DeliveryService::new(Arc::new(mock), 1, 60),
		)
	}

	#[tokio::test]
	async fn test_submit_targets_contract() {
		let mut mock = MockDeliveryInterface::new();
		mock.expect_submit()
			.withf(|tx| tx.to == Address::repeat_byte(0xcc) && tx.data.len() > 4)
			.times(1)
			.returning(|_| Box::pin(async { Ok(TransactionHash(vec![0x01; 32])) }));

		let hash = client(mock)
			.submit("createService", &[DynSolValue::String("Mow the lawn".into())])
			.await
			.unwrap();
		assert_eq!(hash.0, vec![0x01; 32]);
	}

	#[tokio::test]
	async fn test_submit_encoding_error_never_reaches_delivery() {
		let mut mock = MockDeliveryInterface::new();
		mock.expect_submit().never();

		let err = client(mock).submit("createService", &[]).await.unwrap_err();
		assert!(matches!(err, ContractError::Encode { .. }));
	}

	#[tokio::test]
	async fn test_wait_for_receipt() {
		let mut mock = MockDeliveryInterface::new();
		mock.expect_wait_for_confirmation()
			.times(1)
			.returning(|_, _, _| {
				Box::pin(async { Ok(TransactionReceiptBuilder::new().with_block_number(9).build()) })
			});

		let receipt = client(mock)
			.wait_for_receipt(&TransactionHash(vec![0x01; 32]))
			.await
			.unwrap();
		assert_eq!(receipt.block_number, 9);
	}

	#[tokio::test]
	async fn test_view_uint() {
		let mut mock = MockDeliveryInterface::new();
		mock.expect_eth_call().times(1).returning(|_| {
			let encoded =
				DynSolValue::Tuple(vec![DynSolValue::Uint(U256::from(12), 256)]).abi_encode_params();
			Box::pin(async move { Ok(Bytes::from(encoded)) })
		});

		let count = client(mock).view_uint("serviceCount", &[]).await.unwrap();
		assert_eq!(count, U256::from(12));
	}

	#[tokio::test]
	async fn test_view_revert_is_kept() {
		let mut mock = MockDeliveryInterface::new();
		mock.expect_eth_call().times(1).returning(|_| {
			Box::pin(async { Err(DeliveryError::Reverted("execution reverted".into())) })
		});

		let err = client(mock)
			.view_record("getService", &[DynSolValue::Uint(U256::from(1), 256)])
			.await
			.unwrap_err();
		assert!(matches!(err, ContractError::Delivery(DeliveryError::Reverted(_))));
	}

	#[test]
	fn test_supports() {
		let client = client(MockDeliveryInterface::new());
		assert!(client.supports("getAllServices"));
		assert!(!client.supports("obtenerTodosLosServicios"));
	}
}
