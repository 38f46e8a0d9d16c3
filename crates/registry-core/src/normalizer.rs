//! Normalization of decoded contract values into canonical records.
//!
//! Each field is looked up by name (English first, then the Spanish name
//! used by the first deployment of the contract), then by its position in
//! the struct, and finally defaulted. Missing text becomes `""`, missing
//! numbers `0` and missing flags `false`.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::U256;
use registry_types::{with_0x_prefix, RawRecord, ServiceRecord, ServiceStatus, UserRecord};

const SERVICE_ID: (&[&str], usize) = (&["id"], 0);
const SERVICE_CREATOR: (&[&str], usize) = (&["creator", "creador"], 1);
const SERVICE_DESCRIPTION: (&[&str], usize) = (&["description", "descripcion"], 2);
const SERVICE_CREATED_AT: (&[&str], usize) = (&["createdAt", "fechaCreacion"], 3);
const SERVICE_STATUS: (&[&str], usize) = (&["status", "estado"], 4);

const USER_WALLET: (&[&str], usize) = (&["wallet"], 0);
const USER_NAME: (&[&str], usize) = (&["name", "nombre"], 1);
const USER_EMAIL: (&[&str], usize) = (&["email"], 2);
const USER_REGISTERED: (&[&str], usize) = (&["registered", "registrado"], 3);

fn field<'a>(raw: &'a RawRecord, (names, slot): (&[&str], usize)) -> Option<&'a DynSolValue> {
	raw.probe(names, slot)
}

pub fn normalize_service(raw: &RawRecord) -> ServiceRecord {
	ServiceRecord {
		id: to_uint(field(raw, SERVICE_ID)),
		creator: to_text(field(raw, SERVICE_CREATOR)),
		description: to_text(field(raw, SERVICE_DESCRIPTION)),
		created_at: to_uint(field(raw, SERVICE_CREATED_AT)),
		status: ServiceStatus::from_code(to_uint(field(raw, SERVICE_STATUS))),
	}
}

pub fn normalize_user(raw: &RawRecord) -> UserRecord {
	UserRecord {
		wallet: to_text(field(raw, USER_WALLET)),
		name: to_text(field(raw, USER_NAME)),
		email: to_text(field(raw, USER_EMAIL)),
		registered: to_bool(field(raw, USER_REGISTERED)),
	}
}

/// Coerces a value to an unsigned 256-bit integer.
///
/// Negative integers and anything non-numeric yield zero. Numeric strings
/// are parsed, decimal or `0x` hex.
fn to_uint(value: Option<&DynSolValue>) -> U256 {
	match value {
		Some(DynSolValue::Uint(v, _)) => *v,
		Some(DynSolValue::Int(v, _)) if !v.is_negative() => v.into_raw(),
		Some(DynSolValue::String(s)) => s.trim().parse().unwrap_or_default(),
		_ => U256::ZERO,
	}
}

fn to_bool(value: Option<&DynSolValue>) -> bool {
	match value {
		Some(DynSolValue::Bool(b)) => *b,
		Some(DynSolValue::Uint(v, _)) => !v.is_zero(),
		_ => false,
	}
}

fn to_text(value: Option<&DynSolValue>) -> String {
	value.map(render_value).unwrap_or_default()
}

/// Renders a value as a string: integers in decimal, addresses checksummed,
/// byte values as 0x-prefixed hex. Composite values render as empty.
pub fn render_value(value: &DynSolValue) -> String {
	match value {
		DynSolValue::String(s) => s.clone(),
		DynSolValue::Address(address) => address.to_checksum(None),
		DynSolValue::Uint(v, _) => v.to_string(),
		DynSolValue::Int(v, _) => v.to_string(),
		DynSolValue::Bool(b) => b.to_string(),
		DynSolValue::FixedBytes(word, size) => {
			with_0x_prefix(&hex::encode(&word.as_slice()[..(*size).min(32)]))
		},
		DynSolValue::Bytes(bytes) => with_0x_prefix(&hex::encode(bytes)),
		_ => String::new(),
	}
}
