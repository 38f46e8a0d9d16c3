//! Transaction receipt builder.

use crate::{Log, TransactionHash, TransactionReceipt};

/// Builder for [`TransactionReceipt`] with sensible defaults.
#[derive(Debug, Clone)]
pub struct TransactionReceiptBuilder {
	hash: TransactionHash,
	block_number: u64,
	success: bool,
	logs: Vec<Log>,
}

impl Default for TransactionReceiptBuilder {
	fn default() -> Self {
		Self {
			hash: TransactionHash(vec![0x11; 32]),
			block_number: 12345,
			success: true,
			logs: Vec::new(),
		}
	}
}

impl TransactionReceiptBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_hash(mut self, hash: TransactionHash) -> Self {
		self.hash = hash;
		self
	}

	pub fn with_block_number(mut self, block_number: u64) -> Self {
		self.block_number = block_number;
		self
	}

	/// Convenience method to create a failed receipt.
	pub fn failed(mut self) -> Self {
		self.success = false;
		self
	}

	/// Appends a log to the receipt.
	pub fn with_log(mut self, log: Log) -> Self {
		self.logs.push(log);
		self
	}

	pub fn build(self) -> TransactionReceipt {
		TransactionReceipt {
			hash: self.hash,
			block_number: self.block_number,
			success: self.success,
			logs: self.logs,
		}
	}
}
