//! The six registry operations.

use crate::events::extract_event_argument;
use crate::executor::{ContractCall, TransactionExecutor};
use crate::normalizer::{normalize_service, normalize_user};
use crate::reader::{RegistryReader, ServiceListing};
use crate::validation::InputValidator;
use crate::RegistryError;
use alloy_dyn_abi::DynSolValue;
use alloy_primitives::U256;
use registry_config::{Config, EventNames, MethodNames};
use registry_contract::{ContractAbi, ContractClient, ContractError};
use registry_delivery::{create_delivery, DeliveryError, DeliveryService};
use registry_types::{parse_address, ServiceRecord, TransactionHash, UserRecord};
use serde::Serialize;
use std::sync::Arc;

/// Result of a state-changing operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
	pub transaction_hash: TransactionHash,
}

/// Result of creating a service.
///
/// `service_id` is `None` when the confirmed transaction carried no
/// creation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedService {
	pub service_id: Option<String>,
	pub transaction_hash: TransactionHash,
}

/// Identity of the running bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeInfo {
	pub registry_id: String,
	pub contract_address: String,
	pub signer_address: String,
	pub read_strategy: &'static str,
}

/// Entry point for every registry operation.
///
/// Holds the shared contract client and the startup decisions (read
/// strategy, method and event names); each call is otherwise independent.
#[derive(Debug)]
pub struct RegistryService {
	registry_id: String,
	client: Arc<ContractClient>,
	executor: TransactionExecutor,
	reader: RegistryReader,
	validator: InputValidator,
	methods: MethodNames,
	events: EventNames,
}

impl RegistryService {
	/// Builds the service from configuration: loads the ABI, creates the
	/// delivery implementation and checks the ABI against the configured
	/// method names.
	pub async fn from_config(config: &Config) -> Result<Self, RegistryError> {
		let abi = ContractAbi::from_file(&config.contract.abi_path)
			.await
			.map_err(|e| RegistryError::Configuration(e.to_string()))?;

		let address = parse_address(&config.contract.address)
			.map_err(|e| RegistryError::Configuration(format!("Invalid contract address: {e}")))?;

		let primary = &config.delivery.primary;
		let implementation_config = config.delivery.implementations.get(primary).ok_or_else(|| {
			RegistryError::Configuration(format!(
				"Primary delivery '{primary}' not found in implementations"
			))
		})?;
		let implementation = create_delivery(primary, implementation_config)
			.map_err(|e| RegistryError::Configuration(e.to_string()))?;

		let delivery = DeliveryService::new(
			Arc::from(implementation),
			config.delivery.confirmations,
			config.delivery.confirmation_timeout_seconds,
		);
		let client = Arc::new(ContractClient::new(address, Arc::new(abi), delivery));

		Self::new(client, config)
	}

	/// Builds the service around an existing client.
	pub fn new(client: Arc<ContractClient>, config: &Config) -> Result<Self, RegistryError> {
		let methods = config.contract.methods.clone();
		for (key, name) in methods.required() {
			if !client.supports(name) {
				return Err(RegistryError::Configuration(format!(
					"Method '{name}' (contract.methods.{key}) is not in the contract ABI"
				)));
			}
		}

		let events = config.contract.events.clone();
		if !client.abi().has_event(&events.service_created) {
			tracing::warn!(
				event = %events.service_created,
				"Creation event not in ABI; created services will have no id"
			);
		}

		let reader = RegistryReader::select(client.clone(), &methods, &config.reader)?;

		tracing::info!(
			registry_id = %config.registry.id,
			contract = %client.address(),
			read_strategy = reader.strategy_name(),
			"Registry service ready"
		);

		Ok(Self {
			registry_id: config.registry.id.clone(),
			executor: TransactionExecutor::new(client.clone()),
			client,
			reader,
			validator: InputValidator::new()?,
			methods,
			events,
		})
	}

	pub fn info(&self) -> BridgeInfo {
		BridgeInfo {
			registry_id: self.registry_id.clone(),
			contract_address: self.client.address().to_checksum(None),
			signer_address: self.client.signer_address().to_checksum(None),
			read_strategy: self.reader.strategy_name(),
		}
	}

	/// Registers the signing account as a user.
	///
	/// `wallet` is validated but not sent: the contract registers the
	/// transaction sender.
	pub async fn register_user(
		&self,
		name: &str,
		email: &str,
		wallet: &str,
	) -> Result<TransactionResult, RegistryError> {
		self.validator.required("name", name)?;
		self.validator.required("email", email)?;
		self.validator.required("wallet", wallet)?;
		self.validator.email(email)?;
		self.validator.wallet(wallet)?;

		let call = ContractCall::new(
			&self.methods.register_user,
			vec![
				DynSolValue::String(name.to_string()),
				DynSolValue::String(email.to_string()),
			],
		);
		let confirmation = self.executor.execute(call).await?;

		Ok(TransactionResult {
			transaction_hash: confirmation.transaction_hash,
		})
	}

	/// Creates a service and reports the id from the creation event.
	pub async fn create_service(
		&self,
		description: &str,
		wallet: &str,
	) -> Result<CreatedService, RegistryError> {
		self.validator.required("description", description)?;
		self.validator.required("wallet", wallet)?;
		self.validator.description(description)?;
		self.validator.wallet(wallet)?;

		let call = ContractCall::new(
			&self.methods.create_service,
			vec![DynSolValue::String(description.to_string())],
		);
		let confirmation = self.executor.execute(call).await?;

		let service_id = extract_event_argument(
			self.client.abi(),
			&confirmation.logs,
			&self.events.service_created,
			&self.events.service_id_argument,
		);
		match &service_id {
			Some(id) => tracing::info!(service_id = %id, tx_hash = %confirmation.transaction_hash, "Service created"),
			None => tracing::warn!(
				event = %self.events.service_created,
				tx_hash = %confirmation.transaction_hash,
				"Service created but no creation event found"
			),
		}

		Ok(CreatedService {
			service_id,
			transaction_hash: confirmation.transaction_hash,
		})
	}

	/// Sets the status of a service. Any status may follow any other.
	pub async fn update_service_status(
		&self,
		id: U256,
		new_status: i64,
	) -> Result<TransactionResult, RegistryError> {
		let status = self.validator.status(new_status)?;

		let call = ContractCall::new(
			&self.methods.update_service_status,
			vec![DynSolValue::Uint(id, 256), DynSolValue::Uint(status, 256)],
		);
		let confirmation = self.executor.execute(call).await?;

		Ok(TransactionResult {
			transaction_hash: confirmation.transaction_hash,
		})
	}

	/// Reads one service.
	///
	/// A revert, an empty return or a record without a creator means the
	/// service does not exist.
	pub async fn get_service(&self, id: U256) -> Result<ServiceRecord, RegistryError> {
		let not_found = || RegistryError::RecordNotFound(format!("Service {id} not found"));

		let raw = self
			.client
			.view_record(&self.methods.get_service, &[DynSolValue::Uint(id, 256)])
			.await
			.map_err(|e| match e {
				ContractError::Delivery(DeliveryError::Reverted(_)) | ContractError::EmptyReturn(_) => {
					not_found()
				},
				other => RegistryError::from_read(other),
			})?;

		let record = normalize_service(&raw);
		let has_creator = parse_address(&record.creator).is_ok_and(|creator| !creator.is_zero());
		if !has_creator {
			return Err(not_found());
		}
		Ok(record)
	}

	/// Reads one user.
	///
	/// An unregistered wallet comes back as the contract returns it, with
	/// `registered` false. Only a revert or an empty return is not found.
	pub async fn get_user(&self, wallet: &str) -> Result<UserRecord, RegistryError> {
		self.validator.required("wallet", wallet)?;
		let address = self.validator.wallet(wallet)?;
		let not_found = || RegistryError::RecordNotFound(format!("User {wallet} not registered"));

		let raw = self
			.client
			.view_record(&self.methods.get_user, &[DynSolValue::Address(address)])
			.await
			.map_err(|e| match e {
				ContractError::Delivery(DeliveryError::Reverted(_)) | ContractError::EmptyReturn(_) => {
					not_found()
				},
				other => RegistryError::from_read(other),
			})?;

		Ok(normalize_user(&raw))
	}

	/// Every readable service, ascending by id.
	pub async fn list_services(&self) -> Result<Vec<ServiceRecord>, RegistryError> {
		Ok(self.list_services_report().await?.records)
	}

	/// Like [`Self::list_services`], also reporting skipped indices.
	pub async fn list_services_report(&self) -> Result<ServiceListing, RegistryError> {
		self.reader.list().await
	}
}
