//! Event log builder.

use crate::{Log, H256};
use alloy_primitives::{Address, B256, U256};

/// Builder for [`Log`] entries.
///
/// Topics and data are appended as 32-byte words, which covers static ABI
/// types such as `uint256` and `address`.
#[derive(Debug, Clone, Default)]
pub struct LogBuilder {
	address: Address,
	topics: Vec<H256>,
	data: Vec<u8>,
}

impl LogBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_address(mut self, address: Address) -> Self {
		self.address = address;
		self
	}

	/// Appends a topic. The first topic is the event selector.
	pub fn with_topic(mut self, topic: B256) -> Self {
		self.topics.push(topic.into());
		self
	}

	/// Appends an indexed `uint256` argument.
	pub fn with_uint_topic(self, value: U256) -> Self {
		self.with_topic(B256::from(value))
	}

	/// Appends an indexed `address` argument.
	pub fn with_address_topic(self, address: Address) -> Self {
		self.with_topic(address.into_word())
	}

	/// Appends a `uint256` word to the non-indexed data.
	pub fn with_uint_data(mut self, value: U256) -> Self {
		self.data.extend_from_slice(&value.to_be_bytes::<32>());
		self
	}

	/// Replaces the non-indexed data with raw bytes.
	pub fn with_data(mut self, data: Vec<u8>) -> Self {
		self.data = data;
		self
	}

	pub fn build(self) -> Log {
		Log {
			address: self.address,
			topics: self.topics,
			data: self.data,
		}
	}
}
