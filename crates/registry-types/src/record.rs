//! Registry record types.
//!
//! [`ServiceRecord`] and [`UserRecord`] are the canonical shapes handed to
//! callers. [`RawRecord`] is what the contract layer produces after ABI
//! decoding, before normalization: depending on whether the ABI carried
//! component names the values arrive keyed by name or only by position.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::U256;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Error as _, SerializeStruct};
use serde::{Serialize, Serializer};
use std::fmt;

/// Lifecycle state of a service as stored on-chain (a small integer).
///
/// Codes outside the known table are kept verbatim in [`ServiceStatus::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceStatus {
	Pending,
	InProgress,
	Completed,
	Cancelled,
	Unknown(U256),
}

impl ServiceStatus {
	/// Highest status code the contract defines.
	pub const MAX_CODE: u64 = 3;

	/// Maps an on-chain status code to its variant.
	pub fn from_code(code: U256) -> Self {
		match u64::try_from(code) {
			Ok(0) => ServiceStatus::Pending,
			Ok(1) => ServiceStatus::InProgress,
			Ok(2) => ServiceStatus::Completed,
			Ok(3) => ServiceStatus::Cancelled,
			_ => ServiceStatus::Unknown(code),
		}
	}

	/// The numeric code, unchanged from what the contract returned.
	pub fn code(&self) -> U256 {
		match self {
			ServiceStatus::Pending => U256::ZERO,
			ServiceStatus::InProgress => U256::from(1),
			ServiceStatus::Completed => U256::from(2),
			ServiceStatus::Cancelled => U256::from(3),
			ServiceStatus::Unknown(code) => *code,
		}
	}

	/// Symbolic name exposed to callers.
	pub fn name(&self) -> &'static str {
		match self {
			ServiceStatus::Pending => "Pending",
			ServiceStatus::InProgress => "InProgress",
			ServiceStatus::Completed => "Completed",
			ServiceStatus::Cancelled => "Cancelled",
			ServiceStatus::Unknown(_) => "Unknown",
		}
	}

	pub fn is_known(&self) -> bool {
		!matches!(self, ServiceStatus::Unknown(_))
	}
}

impl fmt::Display for ServiceStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.name(), self.code())
	}
}

/// A service registered on the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
	pub id: U256,
	pub creator: String,
	pub description: String,
	/// Creation time in Unix seconds, exactly as stored on-chain.
	pub created_at: U256,
	pub status: ServiceStatus,
}

impl ServiceRecord {
	/// Creation time in milliseconds (seconds × 1000, saturating).
	pub fn created_at_millis(&self) -> U256 {
		self.created_at.saturating_mul(U256::from(1000))
	}

	/// Creation time as a UTC timestamp.
	///
	/// Returns `None` when the stored value does not fit the calendar range
	/// supported by `chrono`. No other sanity checks are applied.
	pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
		let millis = i64::try_from(self.created_at_millis()).ok()?;
		DateTime::<Utc>::from_timestamp_millis(millis)
	}

	/// ISO-8601 rendering of the creation time, e.g. `2024-05-01T10:00:00.000Z`.
	pub fn created_at_iso(&self) -> Option<String> {
		self.created_at_utc()
			.map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true))
	}
}

/// External JSON shape:
/// `{ id, creator, description, createdAt, status, statusName }`.
///
/// Serialization fails if `created_at` cannot be represented as a date.
impl Serialize for ServiceRecord {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let created_at = self.created_at_iso().ok_or_else(|| {
			S::Error::custom(format!(
				"createdAt {} is outside the representable date range",
				self.created_at
			))
		})?;

		let mut state = serializer.serialize_struct("ServiceRecord", 6)?;
		state.serialize_field("id", &self.id.to_string())?;
		state.serialize_field("creator", &self.creator)?;
		state.serialize_field("description", &self.description)?;
		state.serialize_field("createdAt", &created_at)?;
		state.serialize_field("status", &StatusCode(self.status.code()))?;
		state.serialize_field("statusName", self.status.name())?;
		state.end()
	}
}

/// Status codes are emitted as JSON numbers while they fit in 64 bits and
/// as decimal strings beyond that, so the value is never truncated.
struct StatusCode(U256);

impl Serialize for StatusCode {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match u64::try_from(self.0) {
			Ok(code) => serializer.serialize_u64(code),
			Err(_) => serializer.serialize_str(&self.0.to_string()),
		}
	}
}

/// A user registered on the contract, keyed by wallet address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
	pub wallet: String,
	pub name: String,
	pub email: String,
	pub registered: bool,
}

/// A decoded contract return value before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
	/// Values paired with the component names declared in the ABI, in order.
	Named(Vec<(String, DynSolValue)>),
	/// Bare values, addressable only by slot.
	Positional(Vec<DynSolValue>),
}

impl RawRecord {
	/// Looks a field up by any of `names`, then by `slot`.
	///
	/// Named records still keep their declaration order, so the positional
	/// fallback applies to both shapes.
	pub fn probe(&self, names: &[&str], slot: usize) -> Option<&DynSolValue> {
		match self {
			RawRecord::Named(fields) => fields
				.iter()
				.find(|(name, _)| names.iter().any(|candidate| candidate == name))
				.or_else(|| fields.get(slot))
				.map(|(_, value)| value),
			RawRecord::Positional(values) => values.get(slot),
		}
	}

	/// The values in declaration order, without names.
	pub fn into_values(self) -> Vec<DynSolValue> {
		match self {
			RawRecord::Named(fields) => fields.into_iter().map(|(_, value)| value).collect(),
			RawRecord::Positional(values) => values,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::Address;

	fn service(created_at: u64, status: u64) -> ServiceRecord {
		ServiceRecord {
			id: U256::from(7),
			creator: "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359".to_string(),
			description: "Fix the kitchen sink".to_string(),
			created_at: U256::from(created_at),
			status: ServiceStatus::from_code(U256::from(status)),
		}
	}

	#[test]
	fn test_status_table() {
		let names: Vec<_> = (0u64..=3)
			.map(|code| ServiceStatus::from_code(U256::from(code)).name())
			.collect();
		assert_eq!(names, ["Pending", "InProgress", "Completed", "Cancelled"]);
	}

	#[test]
	fn test_unknown_status_preserves_code() {
		let status = ServiceStatus::from_code(U256::from(42));
		assert_eq!(status.name(), "Unknown");
		assert_eq!(status.code(), U256::from(42));
		assert!(!status.is_known());

		let huge = U256::MAX;
		assert_eq!(ServiceStatus::from_code(huge).code(), huge);
	}

	#[test]
	fn test_service_record_json() {
		let json = serde_json::to_value(service(1_714_557_600, 1)).unwrap();
		assert_eq!(
			json,
			serde_json::json!({
				"id": "7",
				"creator": "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
				"description": "Fix the kitchen sink",
				"createdAt": "2024-05-01T10:00:00.000Z",
				"status": 1,
				"statusName": "InProgress",
			})
		);
	}

	#[test]
	fn test_unknown_status_json() {
		let json = serde_json::to_value(service(0, 9)).unwrap();
		assert_eq!(json["status"], 9);
		assert_eq!(json["statusName"], "Unknown");
		assert_eq!(json["createdAt"], "1970-01-01T00:00:00.000Z");
	}

	#[test]
	fn test_oversized_status_serializes_as_string() {
		let mut record = service(0, 0);
		record.status = ServiceStatus::Unknown(U256::MAX);
		let json = serde_json::to_value(record).unwrap();
		assert_eq!(json["status"], U256::MAX.to_string());
	}

	#[test]
	fn test_out_of_range_timestamp_fails_only_when_formatted() {
		let mut record = service(0, 0);
		record.created_at = U256::from(u64::MAX);
		assert!(record.created_at_utc().is_none());
		assert!(serde_json::to_value(&record).is_err());
	}

	#[test]
	fn test_probe_named_then_slot() {
		let named = RawRecord::Named(vec![
			("id".to_string(), DynSolValue::Uint(U256::from(1), 256)),
			(
				"creador".to_string(),
				DynSolValue::Address(Address::repeat_byte(0x11)),
			),
		]);
		assert_eq!(
			named.probe(&["creator", "creador"], 5),
			Some(&DynSolValue::Address(Address::repeat_byte(0x11)))
		);
		// Unknown name falls back to the slot.
		assert_eq!(
			named.probe(&["identifier"], 0),
			Some(&DynSolValue::Uint(U256::from(1), 256))
		);
		assert_eq!(named.probe(&["missing"], 9), None);
	}

	#[test]
	fn test_probe_positional() {
		let positional = RawRecord::Positional(vec![DynSolValue::Bool(true)]);
		assert_eq!(positional.probe(&["registered"], 0), Some(&DynSolValue::Bool(true)));
		assert_eq!(positional.probe(&["registered"], 1), None);
	}
}
