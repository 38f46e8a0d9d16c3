//! Configuration builder for tests and local tooling.

use crate::{
	Config, ContractConfig, DeliveryConfig, EventNames, MethodNames, ReadStrategyKind,
	ReaderConfig, RegistryConfig,
};
use std::collections::HashMap;

/// Builds [`Config`] values with defaults pointing at a local node.
///
/// The result is not validated; call sites that need validation should
/// round-trip through TOML instead.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	registry_id: String,
	address: String,
	abi_path: String,
	methods: MethodNames,
	events: EventNames,
	confirmations: u64,
	confirmation_timeout_seconds: u64,
	strategy: ReadStrategyKind,
	concurrency: usize,
	delivery_implementation: toml::Value,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	pub fn new() -> Self {
		let mut evm = toml::map::Map::new();
		evm.insert(
			"rpc_url".to_string(),
			toml::Value::String("http://localhost:8545".to_string()),
		);
		evm.insert(
			"private_key".to_string(),
			toml::Value::String(format!("0x{}", "01".repeat(32))),
		);

		Self {
			registry_id: "test-registry".to_string(),
			address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
			abi_path: "abi.json".to_string(),
			methods: MethodNames::default(),
			events: EventNames::default(),
			confirmations: 1,
			confirmation_timeout_seconds: 120,
			strategy: ReadStrategyKind::Auto,
			concurrency: 1,
			delivery_implementation: toml::Value::Table(evm),
		}
	}

	pub fn registry_id(mut self, id: impl Into<String>) -> Self {
		self.registry_id = id.into();
		self
	}

	pub fn contract_address(mut self, address: impl Into<String>) -> Self {
		self.address = address.into();
		self
	}

	pub fn abi_path(mut self, path: impl Into<String>) -> Self {
		self.abi_path = path.into();
		self
	}

	pub fn methods(mut self, methods: MethodNames) -> Self {
		self.methods = methods;
		self
	}

	pub fn events(mut self, events: EventNames) -> Self {
		self.events = events;
		self
	}

	pub fn confirmations(mut self, confirmations: u64) -> Self {
		self.confirmations = confirmations;
		self
	}

	pub fn confirmation_timeout_seconds(mut self, timeout: u64) -> Self {
		self.confirmation_timeout_seconds = timeout;
		self
	}

	pub fn read_strategy(mut self, strategy: ReadStrategyKind) -> Self {
		self.strategy = strategy;
		self
	}

	pub fn reader_concurrency(mut self, concurrency: usize) -> Self {
		self.concurrency = concurrency;
		self
	}

	/// Replaces the `evm_alloy` implementation table.
	pub fn delivery_implementation(mut self, table: toml::Value) -> Self {
		self.delivery_implementation = table;
		self
	}

	pub fn build(self) -> Config {
		let mut implementations = HashMap::new();
		implementations.insert("evm_alloy".to_string(), self.delivery_implementation);

		Config {
			registry: RegistryConfig {
				id: self.registry_id,
			},
			contract: ContractConfig {
				address: self.address,
				abi_path: self.abi_path,
				methods: self.methods,
				events: self.events,
			},
			delivery: DeliveryConfig {
				primary: "evm_alloy".to_string(),
				confirmations: self.confirmations,
				confirmation_timeout_seconds: self.confirmation_timeout_seconds,
				implementations,
			},
			reader: ReaderConfig {
				strategy: self.strategy,
				concurrency: self.concurrency,
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_build_is_valid() {
		let config = ConfigBuilder::new().build();
		assert!(config.validate().is_ok());
		assert_eq!(config.delivery.primary, "evm_alloy");
		assert_eq!(config.contract.methods.create_service, "createService");
	}

	#[test]
	fn test_overrides() {
		let config = ConfigBuilder::new()
			.read_strategy(ReadStrategyKind::Indexed)
			.reader_concurrency(4)
			.confirmations(3)
			.build();
		assert_eq!(config.reader.strategy, ReadStrategyKind::Indexed);
		assert_eq!(config.reader.concurrency, 4);
		assert_eq!(config.delivery.confirmations, 3);
	}
}
