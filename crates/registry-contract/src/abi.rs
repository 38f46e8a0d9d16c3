//! Contract ABI handling.
//!
//! Calls are encoded from [`DynSolValue`] arguments and outputs are decoded
//! back into [`RawRecord`]s. Whether a record comes out named or positional
//! depends only on the ABI: when every component of the returned struct (or
//! every output) has a name, the names are kept.

use crate::ContractError;
use alloy_dyn_abi::{DynSolType, DynSolValue, EventExt, FunctionExt, JsonAbiExt, Specifier};
use alloy_json_abi::{Function, JsonAbi, Param};
use alloy_primitives::{Bytes, LogData, B256, U256};
use registry_types::{Log, RawRecord};
use std::path::Path;

/// An event log decoded against the ABI.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLog {
	/// Event name as declared in the ABI.
	pub name: String,
	/// Arguments in declaration order, indexed and non-indexed merged.
	pub args: Vec<(String, DynSolValue)>,
}

impl DecodedLog {
	pub fn arg(&self, name: &str) -> Option<&DynSolValue> {
		self.args
			.iter()
			.find(|(arg_name, _)| arg_name == name)
			.map(|(_, value)| value)
	}
}

/// Parsed JSON ABI of the registry contract.
#[derive(Debug, Clone)]
pub struct ContractAbi {
	abi: JsonAbi,
}

impl ContractAbi {
	/// Parses an ABI from JSON.
	///
	/// Accepts either a bare ABI array or a build artifact object carrying
	/// the ABI under an `abi` key.
	pub fn from_json_str(json: &str) -> Result<Self, ContractError> {
		let value: serde_json::Value = serde_json::from_str(json)
			.map_err(|e| ContractError::AbiLoad(format!("Invalid JSON: {}", e)))?;

		let abi_value = match value {
			serde_json::Value::Object(mut artifact) => artifact
				.remove("abi")
				.ok_or_else(|| ContractError::AbiLoad("JSON object has no 'abi' field".into()))?,
			other => other,
		};

		let abi: JsonAbi = serde_json::from_value(abi_value)
			.map_err(|e| ContractError::AbiLoad(format!("Invalid ABI: {}", e)))?;
		Ok(Self { abi })
	}

	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ContractError> {
		let path = path.as_ref();
		let json = tokio::fs::read_to_string(path)
			.await
			.map_err(|e| ContractError::AbiLoad(format!("{}: {}", path.display(), e)))?;
		Self::from_json_str(&json)
	}

	pub fn has_function(&self, name: &str) -> bool {
		self.abi.function(name).is_some_and(|overloads| !overloads.is_empty())
	}

	pub fn has_event(&self, name: &str) -> bool {
		self.abi.event(name).is_some_and(|overloads| !overloads.is_empty())
	}

	fn function(&self, name: &str) -> Result<&Function, ContractError> {
		self.abi
			.function(name)
			.and_then(|overloads| overloads.first())
			.ok_or_else(|| ContractError::UnknownFunction(name.to_string()))
	}

	fn function_with_arity(&self, name: &str, arity: usize) -> Result<&Function, ContractError> {
		let overloads = self
			.abi
			.function(name)
			.ok_or_else(|| ContractError::UnknownFunction(name.to_string()))?;
		overloads
			.iter()
			.find(|function| function.inputs.len() == arity)
			.ok_or_else(|| ContractError::Encode {
				method: name.to_string(),
				message: format!("no overload takes {} argument(s)", arity),
			})
	}

	/// Encodes a call as selector plus arguments.
	///
	/// Integer arguments are re-tagged to the bit width declared in the ABI,
	/// so callers can pass every integer as a 256-bit value.
	pub fn encode_call(&self, name: &str, args: &[DynSolValue]) -> Result<Vec<u8>, ContractError> {
		let function = self.function_with_arity(name, args.len())?;
		let encode_error = |message: String| ContractError::Encode {
			method: name.to_string(),
			message,
		};

		let coerced = function
			.inputs
			.iter()
			.zip(args)
			.map(|(param, value)| {
				let ty = param.resolve().map_err(|e| encode_error(e.to_string()))?;
				Ok(coerce(value.clone(), &ty))
			})
			.collect::<Result<Vec<_>, ContractError>>()?;

		function
			.abi_encode_input(&coerced)
			.map_err(|e| encode_error(e.to_string()))
	}

	/// Decodes the raw output of a call to `name`.
	pub fn decode_output(&self, name: &str, data: &[u8]) -> Result<Vec<DynSolValue>, ContractError> {
		let function = self.function(name)?;
		if data.is_empty() && !function.outputs.is_empty() {
			return Err(ContractError::EmptyReturn(name.to_string()));
		}
		function
			.abi_decode_output(data)
			.map_err(|e| ContractError::Decode {
				method: name.to_string(),
				message: e.to_string(),
			})
	}

	/// Decodes a call returning one record, either a struct or several outputs.
	pub fn decode_record(&self, name: &str, data: &[u8]) -> Result<RawRecord, ContractError> {
		let function = self.function(name)?;
		let values = self.decode_output(name, data)?;

		match function.outputs.as_slice() {
			[single] if is_struct(single) => match values.into_iter().next() {
				Some(DynSolValue::Tuple(fields)) => Ok(label(&single.components, fields)),
				other => Err(unexpected_shape(name, "a struct", other.as_ref())),
			},
			outputs => Ok(label(outputs, values)),
		}
	}

	/// Decodes a call returning an array of structs.
	pub fn decode_records(&self, name: &str, data: &[u8]) -> Result<Vec<RawRecord>, ContractError> {
		let function = self.function(name)?;
		let [output] = function.outputs.as_slice() else {
			return Err(ContractError::Decode {
				method: name.to_string(),
				message: format!("expected one output, ABI declares {}", function.outputs.len()),
			});
		};
		if !is_struct_array(output) {
			return Err(ContractError::Decode {
				method: name.to_string(),
				message: format!("expected a struct array, ABI declares {}", output.ty),
			});
		}

		let values = self.decode_output(name, data)?;
		let items = match values.into_iter().next() {
			Some(DynSolValue::Array(items)) => items,
			other => return Err(unexpected_shape(name, "an array", other.as_ref())),
		};

		items
			.into_iter()
			.map(|item| match item {
				DynSolValue::Tuple(fields) => Ok(label(&output.components, fields)),
				other => Err(unexpected_shape(name, "a struct", Some(&other))),
			})
			.collect()
	}

	/// Decodes a call returning a single unsigned integer.
	pub fn decode_uint(&self, name: &str, data: &[u8]) -> Result<U256, ContractError> {
		match self.decode_output(name, data)?.into_iter().next() {
			Some(DynSolValue::Uint(value, _)) => Ok(value),
			other => Err(unexpected_shape(name, "an unsigned integer", other.as_ref())),
		}
	}

	/// Decodes a log against the ABI's non-anonymous events.
	pub fn decode_log(&self, log: &Log) -> Result<DecodedLog, ContractError> {
		let topics: Vec<B256> = log.topics.iter().copied().map(B256::from).collect();
		let selector = topics
			.first()
			.copied()
			.ok_or_else(|| ContractError::LogDecode("log has no topics".into()))?;

		let event = self
			.abi
			.events()
			.find(|event| !event.anonymous && event.selector() == selector)
			.ok_or_else(|| ContractError::UnknownEvent(selector.to_string()))?;

		let data = LogData::new_unchecked(topics, Bytes::from(log.data.clone()));
		let decoded = event
			.decode_log(&data)
			.map_err(|e| ContractError::LogDecode(format!("{}: {}", event.name, e)))?;

		let mut indexed = decoded.indexed.into_iter();
		let mut body = decoded.body.into_iter();
		let args = event
			.inputs
			.iter()
			.map(|input| {
				let value = if input.indexed {
					indexed.next()
				} else {
					body.next()
				};
				value.map(|value| (input.name.clone(), value))
			})
			.collect::<Option<Vec<_>>>()
			.ok_or_else(|| {
				ContractError::LogDecode(format!("{}: argument count mismatch", event.name))
			})?;

		Ok(DecodedLog {
			name: event.name.clone(),
			args,
		})
	}
}

fn is_struct(param: &Param) -> bool {
	param.ty == "tuple"
}

fn is_struct_array(param: &Param) -> bool {
	param.ty == "tuple[]"
}

/// Pairs values with parameter names when every parameter is named.
fn label(params: &[Param], values: Vec<DynSolValue>) -> RawRecord {
	let all_named = params.len() == values.len() && params.iter().all(|p| !p.name.is_empty());
	if all_named {
		RawRecord::Named(
			params
				.iter()
				.map(|p| p.name.clone())
				.zip(values)
				.collect(),
		)
	} else {
		RawRecord::Positional(values)
	}
}

/// Re-tags integers to the widths of `ty`.
fn coerce(value: DynSolValue, ty: &DynSolType) -> DynSolValue {
	match (value, ty) {
		(DynSolValue::Uint(v, _), DynSolType::Uint(bits)) => DynSolValue::Uint(v, *bits),
		(DynSolValue::Int(v, _), DynSolType::Int(bits)) => DynSolValue::Int(v, *bits),
		(DynSolValue::Array(items), DynSolType::Array(inner)) => {
			DynSolValue::Array(items.into_iter().map(|item| coerce(item, inner)).collect())
		},
		(DynSolValue::Tuple(items), DynSolType::Tuple(types)) if items.len() == types.len() => {
			DynSolValue::Tuple(
				items
					.into_iter()
					.zip(types)
					.map(|(item, ty)| coerce(item, ty))
					.collect(),
			)
		},
		(value, _) => value,
	}
}

fn unexpected_shape(method: &str, expected: &str, found: Option<&DynSolValue>) -> ContractError {
	ContractError::Decode {
		method: method.to_string(),
		message: match found {
			Some(value) => format!("expected {}, got {:?}", expected, value),
			None => format!("expected {}, got nothing", expected),
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::Address;
	use registry_types::LogBuilder;

	const REGISTRY_ABI: &str = include_str!("../tests/fixtures/registry_abi.json");
	const REGISTRO_ABI: &str = include_str!("../tests/fixtures/registro_abi.json");

	fn abi() -> ContractAbi {
		ContractAbi::from_json_str(REGISTRY_ABI).unwrap()
	}

	fn service_fields(id: u64, status: u64) -> Vec<DynSolValue> {
		vec![
			DynSolValue::Uint(U256::from(id), 256),
			DynSolValue::Address(Address::repeat_byte(0x11)),
			DynSolValue::String("Paint the fence".into()),
			DynSolValue::Uint(U256::from(1_714_557_600u64), 256),
			DynSolValue::Uint(U256::from(status), 8),
		]
	}

	#[test]
	fn test_loads_bare_array_and_artifact() {
		assert!(abi().has_function("getAllServices"));
		assert!(abi().has_event("ServiceCreated"));
		let registro = ContractAbi::from_json_str(REGISTRO_ABI).unwrap();
		assert!(registro.has_function("crearServicio"));
		assert!(!registro.has_function("getAllServices"));
	}

	#[test]
	fn test_rejects_garbage() {
		assert!(matches!(
			ContractAbi::from_json_str("{\"contractName\": \"x\"}"),
			Err(ContractError::AbiLoad(_))
		));
		assert!(ContractAbi::from_json_str("not json").is_err());
	}

	#[test]
	fn test_encode_call_retags_integer_width() {
		let abi = abi();
		let args = [
			DynSolValue::Uint(U256::from(7), 256),
			DynSolValue::Uint(U256::from(2), 256),
		];
		let data = abi.encode_call("updateServiceStatus", &args).unwrap();

		let function = &abi.abi.function("updateServiceStatus").unwrap()[0];
		assert_eq!(&data[..4], function.selector().as_slice());
		assert_eq!(data.len(), 4 + 64);
		assert_eq!(data[4 + 31], 7);
		assert_eq!(data[4 + 63], 2);
	}

	#[test]
	fn test_encode_call_wrong_arity() {
		let err = abi()
			.encode_call("createService", &[])
			.unwrap_err();
		assert!(matches!(err, ContractError::Encode { .. }));
	}

	#[test]
	fn test_encode_unknown_function() {
		assert!(matches!(
			abi().encode_call("selfDestruct", &[]),
			Err(ContractError::UnknownFunction(_))
		));
	}

	#[test]
	fn test_decode_struct_output_is_named() {
		let output = DynSolValue::Tuple(vec![DynSolValue::Tuple(service_fields(7, 1))]);
		let record = abi()
			.decode_record("getService", &output.abi_encode_params())
			.unwrap();

		match record {
			RawRecord::Named(fields) => {
				let names: Vec<_> = fields.iter().map(|(name, _)| name.as_str()).collect();
				assert_eq!(names, ["id", "creator", "description", "createdAt", "status"]);
			},
			other => panic!("expected named record, got {other:?}"),
		}
	}

	#[test]
	fn test_decode_multiple_outputs() {
		let registro = ContractAbi::from_json_str(REGISTRO_ABI).unwrap();
		let encoded = DynSolValue::Tuple(service_fields(3, 0)).abi_encode_params();

		// Unnamed outputs stay positional, named getter outputs keep names.
		let positional = registro.decode_record("obtenerServicio", &encoded).unwrap();
		assert!(matches!(positional, RawRecord::Positional(ref v) if v.len() == 5));

		let named = registro.decode_record("servicios", &encoded).unwrap();
		assert_eq!(
			named.probe(&["descripcion"], 99),
			Some(&DynSolValue::String("Paint the fence".into()))
		);
	}

	#[test]
	fn test_decode_records_array() {
		let items = (0..3)
			.map(|id| DynSolValue::Tuple(service_fields(id, id)))
			.collect();
		let output = DynSolValue::Tuple(vec![DynSolValue::Array(items)]);
		let records = abi()
			.decode_records("getAllServices", &output.abi_encode_params())
			.unwrap();
		assert_eq!(records.len(), 3);
		assert_eq!(
			records[2].probe(&["id"], 0),
			Some(&DynSolValue::Uint(U256::from(2), 256))
		);
	}

	#[test]
	fn test_decode_records_rejects_non_array_function() {
		assert!(matches!(
			abi().decode_records("serviceCount", &[0u8; 32]),
			Err(ContractError::Decode { .. })
		));
	}

	#[test]
	fn test_decode_uint_and_empty_return() {
		let abi = abi();
		let encoded = DynSolValue::Tuple(vec![DynSolValue::Uint(U256::from(5), 256)]).abi_encode_params();
		assert_eq!(abi.decode_uint("serviceCount", &encoded).unwrap(), U256::from(5));
		assert!(matches!(
			abi.decode_uint("serviceCount", &[]),
			Err(ContractError::EmptyReturn(_))
		));
	}

	#[test]
	fn test_decode_log_merges_indexed_and_body() {
		let abi = abi();
		let event = abi.abi.event("ServiceCreated").unwrap()[0].clone();
		let creator = Address::repeat_byte(0x42);
		let body = DynSolValue::Tuple(vec![DynSolValue::String("Walk the dog".into())]);

		let log = LogBuilder::new()
			.with_topic(event.selector())
			.with_uint_topic(U256::from(7))
			.with_address_topic(creator)
			.with_data(body.abi_encode_params())
			.build();

		let decoded = abi.decode_log(&log).unwrap();
		assert_eq!(decoded.name, "ServiceCreated");
		let names: Vec<_> = decoded.args.iter().map(|(n, _)| n.as_str()).collect();
		assert_eq!(names, ["id", "creator", "description"]);
		assert_eq!(decoded.arg("id"), Some(&DynSolValue::Uint(U256::from(7), 256)));
		assert_eq!(decoded.arg("creator"), Some(&DynSolValue::Address(creator)));
	}

	#[test]
	fn test_decode_log_unknown_topic() {
		let log = LogBuilder::new().with_topic(B256::repeat_byte(0x99)).build();
		assert!(matches!(abi().decode_log(&log), Err(ContractError::UnknownEvent(_))));

		let empty = LogBuilder::new().build();
		assert!(matches!(abi().decode_log(&empty), Err(ContractError::LogDecode(_))));
	}
}
