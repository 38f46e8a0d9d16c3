//! Common types for the service registry bridge.
//!
//! Everything that more than one registry crate needs to agree on lives here:
//! transaction and receipt shapes, the canonical user and service records,
//! the raw decoded contract values they are normalized from, configuration
//! validation primitives and small conversion helpers.

/// Transaction request type submitted to the chain.
pub mod account;
/// Transaction hashes, logs and receipts.
pub mod delivery;
/// Canonical registry records and the raw shapes they are built from.
pub mod record;
/// Registry trait for self-registering implementations.
pub mod registry;
/// Secure string type for handling sensitive data.
pub mod secret_string;
/// Utility functions for common type conversions.
pub mod utils;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;

pub use account::*;
pub use delivery::*;
pub use record::{RawRecord, ServiceRecord, ServiceStatus, UserRecord};
pub use registry::ImplementationRegistry;
pub use secret_string::SecretString;
pub use utils::{
	parse_address, with_0x_prefix, without_0x_prefix, LogBuilder,
	TransactionReceiptBuilder,
};
pub use validation::*;
