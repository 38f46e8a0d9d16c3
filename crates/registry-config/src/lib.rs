//! Configuration for the service registry bridge.
//!
//! Configuration is a single TOML file. String values may reference
//! environment variables as `${VAR}` or `${VAR:-default}`; a `.env` file in
//! the working directory is loaded before the file is read. The parsed
//! configuration is validated as a whole before it is handed out, so any
//! `Config` a caller holds is internally consistent.

pub mod builders;

pub use builders::config::ConfigBuilder;

use regex::Regex;
use registry_types::parse_address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Identity of this bridge instance.
	pub registry: RegistryConfig,
	/// The registry contract and its interface.
	pub contract: ContractConfig,
	/// Transaction submission and confirmation.
	pub delivery: DeliveryConfig,
	/// How the full service collection is read back.
	#[serde(default)]
	pub reader: ReaderConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryConfig {
	/// Instance identifier, used in logs.
	pub id: String,
}

/// The deployed registry contract.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContractConfig {
	/// Contract address, `0x` followed by 40 hex digits.
	pub address: String,
	/// Path to the contract's JSON ABI, relative to the working directory.
	pub abi_path: String,
	#[serde(default)]
	pub methods: MethodNames,
	#[serde(default)]
	pub events: EventNames,
}

/// Contract function names used for each operation.
///
/// Deployments that use other names (the Spanish-named original contract,
/// for example) override individual entries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MethodNames {
	pub register_user: String,
	pub create_service: String,
	pub update_service_status: String,
	pub get_service: String,
	pub get_user: String,
	/// Bulk read returning every service at once. Optional on the contract.
	pub get_all_services: String,
	/// Number of services, used by the indexed reader.
	pub service_count: String,
	/// Service by position, used by the indexed reader.
	pub service_at: String,
}

impl Default for MethodNames {
	fn default() -> Self {
		Self {
			register_user: "registerUser".to_string(),
			create_service: "createService".to_string(),
			update_service_status: "updateServiceStatus".to_string(),
			get_service: "getService".to_string(),
			get_user: "getUser".to_string(),
			get_all_services: "getAllServices".to_string(),
			service_count: "serviceCount".to_string(),
			service_at: "services".to_string(),
		}
	}
}

impl MethodNames {
	/// Methods every deployment must expose.
	pub fn required(&self) -> [(&'static str, &str); 5] {
		[
			("register_user", self.register_user.as_str()),
			("create_service", self.create_service.as_str()),
			("update_service_status", self.update_service_status.as_str()),
			("get_service", self.get_service.as_str()),
			("get_user", self.get_user.as_str()),
		]
	}
}

/// Events the bridge extracts data from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EventNames {
	/// Event emitted by the create call.
	pub service_created: String,
	/// Argument of that event carrying the new identifier.
	pub service_id_argument: String,
}

impl Default for EventNames {
	fn default() -> Self {
		Self {
			service_created: "ServiceCreated".to_string(),
			service_id_argument: "id".to_string(),
		}
	}
}

/// Configuration for delivery mechanisms.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeliveryConfig {
	/// Which implementation to use.
	pub primary: String,
	/// Confirmations to wait for after inclusion.
	#[serde(default = "default_confirmations")]
	pub confirmations: u64,
	/// Upper bound on the confirmation wait.
	#[serde(default = "default_confirmation_timeout_seconds")]
	pub confirmation_timeout_seconds: u64,
	/// Map of delivery implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

fn default_confirmations() -> u64 {
	1
}

fn default_confirmation_timeout_seconds() -> u64 {
	120
}

/// Which listing strategy the reader uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadStrategyKind {
	/// Bulk read when the ABI has it, indexed otherwise.
	#[default]
	Auto,
	Bulk,
	Indexed,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReaderConfig {
	#[serde(default)]
	pub strategy: ReadStrategyKind,
	/// Parallel per-index reads for the indexed strategy. 1 reads sequentially.
	#[serde(default = "default_concurrency")]
	pub concurrency: usize,
}

impl Default for ReaderConfig {
	fn default() -> Self {
		Self {
			strategy: ReadStrategyKind::default(),
			concurrency: default_concurrency(),
		}
	}
}

fn default_concurrency() -> usize {
	1
}

/// Replaces `${VAR}` and `${VAR:-default}` references with their values.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {e}")))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let var_name = var_name.as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{var_name}' not found"
					)))
				},
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Reverse order keeps earlier offsets valid.
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a file.
	///
	/// Variables from a `.env` file in the working directory are loaded first;
	/// variables already set in the environment take precedence.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		if let Err(e) = dotenvy::dotenv() {
			if !e.not_found() {
				tracing::warn!(error = %e, "Failed to load .env file");
			}
		}

		let content = tokio::fs::read_to_string(path).await.map_err(|e| {
			ConfigError::Io(std::io::Error::new(
				e.kind(),
				format!("{}: {}", path.display(), e),
			))
		})?;
		content.parse()
	}

	/// Checks cross-field constraints that serde cannot express.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.registry.id.trim().is_empty() {
			return Err(ConfigError::Validation("Registry ID cannot be empty".into()));
		}

		parse_address(&self.contract.address).map_err(|e| {
			ConfigError::Validation(format!("Invalid contract address: {e}"))
		})?;
		if self.contract.abi_path.trim().is_empty() {
			return Err(ConfigError::Validation(
				"Contract abi_path cannot be empty".into(),
			));
		}

		let methods = &self.contract.methods;
		let optional = [
			("get_all_services", methods.get_all_services.as_str()),
			("service_count", methods.service_count.as_str()),
			("service_at", methods.service_at.as_str()),
		];
		for (key, name) in methods.required().into_iter().chain(optional) {
			if name.trim().is_empty() {
				return Err(ConfigError::Validation(format!(
					"Contract method name '{key}' cannot be empty"
				)));
			}
		}

		let events = &self.contract.events;
		if events.service_created.trim().is_empty() || events.service_id_argument.trim().is_empty()
		{
			return Err(ConfigError::Validation(
				"Contract event names cannot be empty".into(),
			));
		}

		if self.delivery.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one delivery implementation required".into(),
			));
		}
		if !self
			.delivery
			.implementations
			.contains_key(&self.delivery.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary delivery '{}' not found in implementations",
				self.delivery.primary
			)));
		}
		if self.delivery.confirmations == 0 || self.delivery.confirmations > 100 {
			return Err(ConfigError::Validation(
				"confirmations must be between 1 and 100".into(),
			));
		}
		if self.delivery.confirmation_timeout_seconds == 0
			|| self.delivery.confirmation_timeout_seconds > 3600
		{
			return Err(ConfigError::Validation(
				"confirmation_timeout_seconds must be between 1 and 3600 seconds".into(),
			));
		}

		if self.reader.concurrency == 0 || self.reader.concurrency > 64 {
			return Err(ConfigError::Validation(
				"reader concurrency must be between 1 and 64".into(),
			));
		}

		Ok(())
	}
}

/// Parses TOML, resolving environment variables first and validating after.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
