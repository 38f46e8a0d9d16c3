//! Input checks applied before anything reaches the contract.

use crate::RegistryError;
use alloy_primitives::{Address, U256};
use regex::Regex;
use registry_types::{parse_address, ServiceStatus};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const DESCRIPTION_MIN_CHARS: usize = 10;
const DESCRIPTION_MAX_CHARS: usize = 500;

/// Validates caller-supplied fields.
#[derive(Debug, Clone)]
pub struct InputValidator {
	email: Regex,
}

impl InputValidator {
	pub fn new() -> Result<Self, RegistryError> {
		let email = Regex::new(EMAIL_PATTERN)
			.map_err(|e| RegistryError::Configuration(format!("Regex error: {e}")))?;
		Ok(Self { email })
	}

	/// Rejects empty or whitespace-only values.
	pub fn required(&self, field: &str, value: &str) -> Result<(), RegistryError> {
		if value.trim().is_empty() {
			return Err(RegistryError::Validation(format!(
				"Missing required field: {field}"
			)));
		}
		Ok(())
	}

	pub fn email(&self, email: &str) -> Result<(), RegistryError> {
		if !self.email.is_match(email) {
			return Err(RegistryError::Validation(format!(
				"Invalid email address: {email}"
			)));
		}
		Ok(())
	}

	/// Description length is counted in characters, untrimmed.
	pub fn description(&self, description: &str) -> Result<(), RegistryError> {
		let chars = description.chars().count();
		if !(DESCRIPTION_MIN_CHARS..=DESCRIPTION_MAX_CHARS).contains(&chars) {
			return Err(RegistryError::Validation(format!(
				"Description must be between {DESCRIPTION_MIN_CHARS} and {DESCRIPTION_MAX_CHARS} characters, got {chars}"
			)));
		}
		Ok(())
	}

	pub fn wallet(&self, wallet: &str) -> Result<Address, RegistryError> {
		parse_address(wallet)
			.map_err(|e| RegistryError::Validation(format!("Invalid wallet address: {e}")))
	}

	/// Accepts status codes 0 through 3.
	pub fn status(&self, status: i64) -> Result<U256, RegistryError> {
		match u64::try_from(status) {
			Ok(code) if code <= ServiceStatus::MAX_CODE => Ok(U256::from(code)),
			_ => Err(RegistryError::Validation(format!(
				"Invalid status {status}: must be between 0 and {}",
				ServiceStatus::MAX_CODE
			))),
		}
	}
}

/// Parses a service identifier given as a decimal string.
pub fn parse_service_id(input: &str) -> Result<U256, RegistryError> {
	let trimmed = input.trim();
	if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
		return Err(RegistryError::Validation(format!(
			"Invalid service id '{input}': expected a non-negative integer"
		)));
	}
	U256::from_str_radix(trimmed, 10).map_err(|_| {
		RegistryError::Validation(format!("Invalid service id '{input}': out of range"))
	})
}
