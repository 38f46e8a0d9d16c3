//! Core of the service registry bridge.
//!
//! [`RegistryService`] exposes the registry operations. Underneath it:
//! - [`executor`] submits state-changing calls and waits for confirmation,
//! - [`events`] pulls identifiers out of confirmed logs,
//! - [`reader`] rebuilds the full service list with a bulk or indexed strategy,
//! - [`normalizer`] maps named or positional contract output to records.

pub mod error;
pub mod events;
pub mod executor;
pub mod normalizer;
pub mod reader;
pub mod service;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use error::{PartialEnumerationFailure, RegistryError, SkippedIndex};
pub use executor::{Confirmation, ContractCall, TransactionExecutor};
pub use reader::{BulkRead, IndexedRead, ReadStrategy, RegistryReader, ServiceListing};
pub use service::{BridgeInfo, CreatedService, RegistryService, TransactionResult};
pub use validation::{parse_service_id, InputValidator};
