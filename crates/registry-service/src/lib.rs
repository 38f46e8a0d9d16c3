//! Command surface of the `registry` binary.
//!
//! Each [`Command`] maps to one [`RegistryService`] operation and produces a
//! JSON document. Failures are rendered as `{ "error": <kind>, "message": <text> }`.

use clap::Subcommand;
use registry_core::{parse_service_id, RegistryError, RegistryService, ServiceListing};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Operations exposed on the command line.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
	/// Register the signing wallet as a user
	RegisterUser {
		#[arg(long)]
		name: String,
		#[arg(long)]
		email: String,
		#[arg(long)]
		wallet: String,
	},
	/// Create a new service
	CreateService {
		#[arg(long)]
		description: String,
		#[arg(long)]
		wallet: String,
	},
	/// Set the status of a service (0 Pending, 1 InProgress, 2 Completed, 3 Cancelled)
	UpdateStatus {
		/// Service id, decimal
		id: String,
		#[arg(allow_negative_numbers = true)]
		status: i64,
	},
	/// Read one service
	GetService {
		/// Service id, decimal
		id: String,
	},
	/// Read one user
	GetUser {
		wallet: String,
	},
	/// List every service
	ListServices,
	/// Show contract, signer and read strategy
	Status,
}

/// Errors produced while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
	#[error(transparent)]
	Registry(#[from] RegistryError),
	#[error("Failed to render output: {0}")]
	Output(#[from] serde_json::Error),
}

impl CommandError {
	pub fn kind(&self) -> &'static str {
		match self {
			CommandError::Registry(e) => e.kind(),
			CommandError::Output(_) => "SerializationError",
		}
	}

	/// Machine-readable rendering of the failure.
	pub fn to_json(&self) -> Value {
		json!({
			"error": self.kind(),
			"message": self.to_string(),
		})
	}
}

/// Runs `command` against `service` and returns its JSON output.
pub async fn execute(service: &RegistryService, command: Command) -> Result<Value, CommandError> {
	match command {
		Command::RegisterUser {
			name,
			email,
			wallet,
		} => render(&service.register_user(&name, &email, &wallet).await?),
		Command::CreateService {
			description,
			wallet,
		} => render(&service.create_service(&description, &wallet).await?),
		Command::UpdateStatus { id, status } => {
			let id = parse_service_id(&id)?;
			render(&service.update_service_status(id, status).await?)
		},
		Command::GetService { id } => {
			let id = parse_service_id(&id)?;
			render(&service.get_service(id).await?)
		},
		Command::GetUser { wallet } => render(&service.get_user(&wallet).await?),
		Command::ListServices => listing_output(&service.list_services_report().await?),
		Command::Status => render(&service.info()),
	}
}

/// Listing output: the services, their count and any skipped indices.
pub fn listing_output(listing: &ServiceListing) -> Result<Value, CommandError> {
	let mut output = json!({
		"services": serde_json::to_value(&listing.records)?,
		"total": listing.records.len(),
	});
	if !listing.skipped.is_empty() {
		output["skipped"] = serde_json::to_value(&listing.skipped)?;
	}
	Ok(output)
}

fn render<T: Serialize>(value: &T) -> Result<Value, CommandError> {
	Ok(serde_json::to_value(value)?)
}
