use registry_delivery::DeliveryError;
use thiserror::Error;

/// Errors raised while encoding, calling or decoding the registry contract.
#[derive(Debug, Error)]
pub enum ContractError {
	#[error("Failed to load ABI: {0}")]
	AbiLoad(String),
	#[error("Function '{0}' not found in ABI")]
	UnknownFunction(String),
	#[error("No event in ABI matches log topic {0}")]
	UnknownEvent(String),
	#[error("Failed to encode call to '{method}': {message}")]
	Encode { method: String, message: String },
	#[error("Failed to decode output of '{method}': {message}")]
	Decode { method: String, message: String },
	#[error("Failed to decode log: {0}")]
	LogDecode(String),
	/// The call succeeded but returned no bytes, which is what a node reports
	/// for calls to an address without code or a function that exited early.
	#[error("'{0}' returned no data")]
	EmptyReturn(String),
	#[error(transparent)]
	Delivery(#[from] DeliveryError),
}
