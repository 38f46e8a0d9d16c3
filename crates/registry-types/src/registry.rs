//! Registry trait for self-registering implementations.

/// Implemented by every pluggable backend so it can be looked up by the name
/// used under `implementations` in the configuration file.
pub trait ImplementationRegistry {
	/// Configuration key of the implementation, e.g. `"evm_alloy"`.
	const NAME: &'static str;

	/// Factory signature the implementation provides.
	type Factory;

	/// Returns the factory that builds the implementation from configuration.
	fn factory() -> Self::Factory;
}
