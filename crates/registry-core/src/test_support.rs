//! Shared fixtures for unit tests.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{keccak256, Address, Bytes, U256};
use registry_contract::{ContractAbi, ContractClient};
use registry_delivery::{DeliveryService, MockDeliveryInterface};
use registry_types::{Log, LogBuilder, TransactionHash};
use std::sync::Arc;

pub const CREATOR: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
pub const CREATED_AT: u64 = 1_714_557_600;

pub fn test_hash() -> TransactionHash {
	TransactionHash(vec![0x5a; 32])
}

pub fn registry_abi() -> ContractAbi {
	ContractAbi::from_json_str(include_str!(
		"../../registry-contract/tests/fixtures/registry_abi.json"
	))
	.unwrap()
}

pub fn registro_abi() -> ContractAbi {
	ContractAbi::from_json_str(include_str!(
		"../../registry-contract/tests/fixtures/registro_abi.json"
	))
	.unwrap()
}

pub fn client_with(mock: MockDeliveryInterface) -> Arc<ContractClient> {
	client_with_abi(mock, registry_abi())
}

pub fn client_with_abi(mock: MockDeliveryInterface, abi: ContractAbi) -> Arc<ContractClient> {
	Arc::new(ContractClient::new(
		Address::repeat_byte(0xcc),
		Arc::new(abi),
		DeliveryService::new(Arc::new(mock), 1, 60),
	))
}

pub fn creator() -> Address {
	CREATOR.parse().unwrap()
}

pub fn service_fields(id: u64, status: u64) -> Vec<DynSolValue> {
	vec![
		DynSolValue::Uint(U256::from(id), 256),
		DynSolValue::Address(creator()),
		DynSolValue::String(format!("Service number {id}")),
		DynSolValue::Uint(U256::from(CREATED_AT + id), 256),
		DynSolValue::Uint(U256::from(status), 8),
	]
}

/// Output of a function returning the service struct.
pub fn encode_service_struct(id: u64, status: u64) -> Bytes {
	DynSolValue::Tuple(vec![DynSolValue::Tuple(service_fields(id, status))])
		.abi_encode_params()
		.into()
}

/// Output of a getter returning the struct fields as separate values.
pub fn encode_service_outputs(id: u64, status: u64) -> Bytes {
	DynSolValue::Tuple(service_fields(id, status))
		.abi_encode_params()
		.into()
}

pub fn encode_services(services: &[(u64, u64)]) -> Bytes {
	let items = services
		.iter()
		.map(|(id, status)| DynSolValue::Tuple(service_fields(*id, *status)))
		.collect();
	DynSolValue::Tuple(vec![DynSolValue::Array(items)])
		.abi_encode_params()
		.into()
}

pub fn encode_count(count: u64) -> Bytes {
	DynSolValue::Tuple(vec![DynSolValue::Uint(U256::from(count), 256)])
		.abi_encode_params()
		.into()
}

pub fn encode_user(name: &str, email: &str, registered: bool) -> Bytes {
	DynSolValue::Tuple(vec![DynSolValue::Tuple(vec![
		DynSolValue::Address(creator()),
		DynSolValue::String(name.into()),
		DynSolValue::String(email.into()),
		DynSolValue::Bool(registered),
	])])
	.abi_encode_params()
	.into()
}

/// `ServiceCreated(uint256 indexed id, address indexed creator, string description)`.
pub fn service_created_log(id: u64) -> Log {
	let body = DynSolValue::Tuple(vec![DynSolValue::String("Walk the dog daily".into())]);
	LogBuilder::new()
		.with_address(Address::repeat_byte(0xcc))
		.with_topic(keccak256("ServiceCreated(uint256,address,string)"))
		.with_uint_topic(U256::from(id))
		.with_address_topic(creator())
		.with_data(body.abi_encode_params())
		.build()
}
