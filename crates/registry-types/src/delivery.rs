//! Transaction delivery types.
//!
//! Hashes, logs and receipts as the rest of the workspace sees them, decoupled
//! from the provider library's own response types.

use crate::with_0x_prefix;
use alloy_primitives::{Address, B256};
use serde::{Serialize, Serializer};
use std::fmt;

/// Blockchain transaction hash representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionHash(pub Vec<u8>);

impl TransactionHash {
	/// Returns the hash as a fixed 32-byte word, if it has the right length.
	pub fn as_b256(&self) -> Option<B256> {
		(self.0.len() == 32).then(|| B256::from_slice(&self.0))
	}
}

impl From<B256> for TransactionHash {
	fn from(hash: B256) -> Self {
		TransactionHash(hash.0.to_vec())
	}
}

impl fmt::Display for TransactionHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", with_0x_prefix(&hex::encode(&self.0)))
	}
}

/// Serialized as a 0x-prefixed hex string.
impl Serialize for TransactionHash {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.to_string())
	}
}

/// Fixed-size hash type for log topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct H256(pub [u8; 32]);

impl From<B256> for H256 {
	fn from(word: B256) -> Self {
		H256(word.0)
	}
}

impl From<H256> for B256 {
	fn from(word: H256) -> Self {
		B256::from(word.0)
	}
}

/// Event log emitted by a contract during a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
	/// Contract address that emitted the log.
	pub address: Address,
	/// Indexed event parameters.
	/// Topic[0] is the event signature hash for non-anonymous events.
	pub topics: Vec<H256>,
	/// Non-indexed event data.
	pub data: Vec<u8>,
}

/// Transaction receipt containing execution details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
	/// The hash of the transaction.
	pub hash: TransactionHash,
	/// The block number where the transaction was included.
	pub block_number: u64,
	/// Whether the transaction executed successfully.
	pub success: bool,
	/// Event logs emitted during transaction execution, in emission order.
	pub logs: Vec<Log>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_transaction_hash_display() {
		let hash = TransactionHash(vec![0xab; 32]);
		assert_eq!(hash.to_string(), format!("0x{}", "ab".repeat(32)));
	}

	#[test]
	fn test_transaction_hash_serializes_as_hex() {
		let hash = TransactionHash(vec![0x01, 0x02]);
		assert_eq!(serde_json::to_string(&hash).unwrap(), "\"0x0102\"");
	}

	#[test]
	fn test_transaction_hash_as_b256() {
		assert!(TransactionHash(vec![0u8; 31]).as_b256().is_none());
		let word = B256::repeat_byte(0x42);
		assert_eq!(TransactionHash::from(word).as_b256(), Some(word));
	}

	#[test]
	fn test_h256_round_trip() {
		let word = B256::repeat_byte(0x07);
		let topic = H256::from(word);
		assert_eq!(B256::from(topic), word);
	}
}
