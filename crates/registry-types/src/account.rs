//! Transaction request type for the registry contract.
//!
//! The bridge only ever talks to a single contract, so a transaction is a
//! destination plus ABI-encoded calldata. Signing, nonce and fee fields are
//! left to the provider's fillers.

use alloy_primitives::{Address, Bytes, TxKind};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use serde::{Deserialize, Serialize};

/// Contract call ready for submission or simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
	/// Contract receiving the call.
	pub to: Address,
	/// ABI-encoded calldata (selector followed by arguments).
	pub data: Vec<u8>,
	/// Optional explicit gas limit. Estimated by the provider when absent.
	pub gas_limit: Option<u64>,
}

impl Transaction {
	/// Creates a call to `to` carrying `data`.
	pub fn call(to: Address, data: impl Into<Vec<u8>>) -> Self {
		Self {
			to,
			data: data.into(),
			gas_limit: None,
		}
	}

	/// Sets an explicit gas limit.
	pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
		self.gas_limit = Some(gas_limit);
		self
	}
}

/// Conversion from our Transaction type to Alloy's TransactionRequest.
impl From<Transaction> for TransactionRequest {
	fn from(tx: Transaction) -> Self {
		TransactionRequest {
			to: Some(TxKind::Call(tx.to)),
			gas: tx.gas_limit,
			input: TransactionInput::new(Bytes::from(tx.data)),
			..Default::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;

	#[test]
	fn test_transaction_into_request() {
		let to = address!("fB6916095ca1df60bB79Ce92cE3Ea74c37c5d359");
		let tx = Transaction::call(to, vec![0xde, 0xad, 0xbe, 0xef]).with_gas_limit(90_000);

		let request: TransactionRequest = tx.into();

		assert_eq!(request.to, Some(TxKind::Call(to)));
		assert_eq!(request.gas, Some(90_000));
		assert_eq!(
			request.input.input().map(|b| b.to_vec()),
			Some(vec![0xde, 0xad, 0xbe, 0xef])
		);
		assert!(request.value.is_none());
	}

	#[test]
	fn test_transaction_without_gas_limit() {
		let tx = Transaction::call(Address::ZERO, Vec::new());
		let request: TransactionRequest = tx.into();
		assert!(request.gas.is_none());
	}
}
