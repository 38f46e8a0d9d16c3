//! Reconstruction of the full service collection.
//!
//! Two strategies sit behind [`ReadStrategy`]. [`BulkRead`] makes one call
//! returning every service. [`IndexedRead`] reads the service count and then
//! each index in turn, skipping indices that fail. [`RegistryReader::select`]
//! picks one at startup by checking which methods the ABI declares.

use crate::normalizer::normalize_service;
use crate::{PartialEnumerationFailure, RegistryError, SkippedIndex};
use alloy_dyn_abi::DynSolValue;
use alloy_primitives::U256;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use registry_config::{MethodNames, ReadStrategyKind, ReaderConfig};
use registry_contract::ContractClient;
use registry_types::ServiceRecord;
use std::sync::Arc;

/// Services read by a strategy, in ascending index order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceListing {
	pub records: Vec<ServiceRecord>,
	/// Indices the indexed strategy could not read. Always empty for bulk.
	pub skipped: Vec<SkippedIndex>,
}

impl ServiceListing {
	/// Describes the skipped indices, if there are any.
	pub fn partial_failure(&self) -> Option<PartialEnumerationFailure> {
		if self.skipped.is_empty() {
			return None;
		}
		Some(PartialEnumerationFailure {
			total: U256::from(self.records.len() + self.skipped.len()),
			read: self.records.len(),
			indices: self.skipped.iter().map(|s| s.index).collect(),
		})
	}
}

/// A way of reading every service from the contract.
#[async_trait]
pub trait ReadStrategy: Send + Sync {
	/// Short name for logs and status output.
	fn name(&self) -> &'static str;

	async fn read_all(&self) -> Result<ServiceListing, RegistryError>;
}

/// One call returning an array of service structs.
pub struct BulkRead {
	client: Arc<ContractClient>,
	method: String,
}

impl BulkRead {
	pub fn new(client: Arc<ContractClient>, method: impl Into<String>) -> Self {
		Self {
			client,
			method: method.into(),
		}
	}
}

#[async_trait]
impl ReadStrategy for BulkRead {
	fn name(&self) -> &'static str {
		"bulk"
	}

	async fn read_all(&self) -> Result<ServiceListing, RegistryError> {
		let raw = self
			.client
			.view_records(&self.method, &[])
			.await
			.map_err(RegistryError::from_read)?;

		Ok(ServiceListing {
			records: raw.iter().map(normalize_service).collect(),
			skipped: Vec::new(),
		})
	}
}

/// A count call followed by one call per index.
pub struct IndexedRead {
	client: Arc<ContractClient>,
	count_method: String,
	item_method: String,
	concurrency: usize,
}

impl IndexedRead {
	/// `concurrency` bounds the reads in flight; 1 reads sequentially.
	pub fn new(
		client: Arc<ContractClient>,
		count_method: impl Into<String>,
		item_method: impl Into<String>,
		concurrency: usize,
	) -> Self {
		Self {
			client,
			count_method: count_method.into(),
			item_method: item_method.into(),
			concurrency: concurrency.max(1),
		}
	}
}

#[async_trait]
impl ReadStrategy for IndexedRead {
	fn name(&self) -> &'static str {
		"indexed"
	}

	async fn read_all(&self) -> Result<ServiceListing, RegistryError> {
		let count = self
			.client
			.view_uint(&self.count_method, &[])
			.await
			.map_err(RegistryError::from_read)?;
		let count = u64::try_from(count).map_err(|_| {
			RegistryError::ReadFailed(format!("Service count {} is out of range", count))
		})?;

		tracing::debug!(count, concurrency = self.concurrency, "Reading services by index");

		let client = self.client.as_ref();
		let method = self.item_method.as_str();
		// `buffered` yields results in input order regardless of completion order.
		let results: Vec<_> = stream::iter(0..count)
			.map(|index| async move {
				let args = [DynSolValue::Uint(U256::from(index), 256)];
				(index, client.view_record(method, &args).await)
			})
			.buffered(self.concurrency)
			.collect()
			.await;

		let mut listing = ServiceListing::default();
		for (index, result) in results {
			match result {
				Ok(raw) => listing.records.push(normalize_service(&raw)),
				Err(e) => {
					tracing::warn!(index, error = %e, "Skipping unreadable service");
					listing.skipped.push(SkippedIndex {
						index,
						reason: e.to_string(),
					});
				},
			}
		}

		Ok(listing)
	}
}

/// The read strategy chosen for this contract.
pub struct RegistryReader {
	strategy: Box<dyn ReadStrategy>,
}

impl std::fmt::Debug for RegistryReader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RegistryReader")
			.field("strategy", &self.strategy.name())
			.finish()
	}
}

impl RegistryReader {
	pub fn new(strategy: Box<dyn ReadStrategy>) -> Self {
		Self { strategy }
	}

	/// Chooses a strategy from configuration and the contract's ABI.
	///
	/// `auto` prefers the bulk method and falls back to indexed reads.
	/// Forcing a strategy whose methods are missing from the ABI is a
	/// configuration error.
	pub fn select(
		client: Arc<ContractClient>,
		methods: &MethodNames,
		config: &ReaderConfig,
	) -> Result<Self, RegistryError> {
		let has_bulk = client.supports(&methods.get_all_services);
		let has_indexed =
			client.supports(&methods.service_count) && client.supports(&methods.service_at);

		let use_bulk = match config.strategy {
			ReadStrategyKind::Auto if has_bulk => true,
			ReadStrategyKind::Auto if has_indexed => false,
			ReadStrategyKind::Auto => {
				return Err(RegistryError::Configuration(format!(
					"ABI declares neither '{}' nor both '{}' and '{}'",
					methods.get_all_services, methods.service_count, methods.service_at
				)))
			},
			ReadStrategyKind::Bulk if has_bulk => true,
			ReadStrategyKind::Bulk => {
				return Err(RegistryError::Configuration(format!(
					"Bulk read requested but '{}' is not in the ABI",
					methods.get_all_services
				)))
			},
			ReadStrategyKind::Indexed if has_indexed => false,
			ReadStrategyKind::Indexed => {
				return Err(RegistryError::Configuration(format!(
					"Indexed read requested but '{}' or '{}' is not in the ABI",
					methods.service_count, methods.service_at
				)))
			},
		};

		let strategy: Box<dyn ReadStrategy> = if use_bulk {
			Box::new(BulkRead::new(client, methods.get_all_services.clone()))
		} else {
			Box::new(IndexedRead::new(
				client,
				methods.service_count.clone(),
				methods.service_at.clone(),
				config.concurrency,
			))
		};

		tracing::info!(strategy = strategy.name(), "Selected read strategy");
		Ok(Self { strategy })
	}

	pub fn strategy_name(&self) -> &'static str {
		self.strategy.name()
	}

	/// Reads every service. Skipped indices are logged, not raised.
	pub async fn list(&self) -> Result<ServiceListing, RegistryError> {
		let listing = self.strategy.read_all().await?;
		if let Some(failure) = listing.partial_failure() {
			tracing::warn!(
				strategy = self.strategy.name(),
				skipped = ?failure.indices,
				"{}",
				failure
			);
		}
		Ok(listing)
	}
}
