//! Submission and confirmation of state-changing contract calls.

use crate::RegistryError;
use alloy_dyn_abi::DynSolValue;
use registry_contract::ContractClient;
use registry_types::{Log, TransactionHash};
use std::sync::Arc;

/// A method name with its ordered arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractCall {
	pub method: String,
	pub args: Vec<DynSolValue>,
}

impl ContractCall {
	pub fn new(method: impl Into<String>, args: Vec<DynSolValue>) -> Self {
		Self {
			method: method.into(),
			args,
		}
	}
}

/// A transaction that was included and executed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
	pub transaction_hash: TransactionHash,
	pub block_number: u64,
	pub logs: Vec<Log>,
}

/// Submits one transaction per call and waits for it to confirm.
///
/// Nothing is retried: a failed submission or a reverted receipt is
/// reported to the caller, who decides whether to try again.
#[derive(Debug, Clone)]
pub struct TransactionExecutor {
	client: Arc<ContractClient>,
}

impl TransactionExecutor {
	pub fn new(client: Arc<ContractClient>) -> Self {
		Self { client }
	}

	pub async fn execute(&self, call: ContractCall) -> Result<Confirmation, RegistryError> {
		let hash = self
			.client
			.submit(&call.method, &call.args)
			.await
			.map_err(|e| {
				tracing::error!(method = %call.method, error = %e, "Submission failed");
				RegistryError::from_write(e)
			})?;

		tracing::info!(method = %call.method, tx_hash = %hash, "Transaction submitted");

		let receipt = self.client.wait_for_receipt(&hash).await.map_err(|e| {
			tracing::error!(method = %call.method, tx_hash = %hash, error = %e, "Confirmation failed");
			RegistryError::from_write(e)
		})?;

		if !receipt.success {
			tracing::warn!(
				method = %call.method,
				tx_hash = %hash,
				block_number = receipt.block_number,
				"Transaction reverted"
			);
			return Err(RegistryError::TransactionFailed(format!(
				"Transaction {} reverted in block {}",
				hash, receipt.block_number
			)));
		}

		tracing::info!(
			method = %call.method,
			tx_hash = %hash,
			block_number = receipt.block_number,
			"Transaction confirmed"
		);

		Ok(Confirmation {
			transaction_hash: hash,
			block_number: receipt.block_number,
			logs: receipt.logs,
		})
	}
}
