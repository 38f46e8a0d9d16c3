//! Extraction of event arguments from confirmed transaction logs.

use crate::normalizer::render_value;
use registry_contract::ContractAbi;
use registry_types::Log;

/// Returns `argument` of the first log decoding to `event_name`.
///
/// Logs are decoded lazily in emission order. Logs from other contracts or
/// events, and logs that fail to decode, are skipped. Later matches are
/// ignored. The value is rendered as a string.
pub fn extract_event_argument(
	abi: &ContractAbi,
	logs: &[Log],
	event_name: &str,
	argument: &str,
) -> Option<String> {
	logs.iter()
		.filter_map(|log| abi.decode_log(log).ok())
		.find(|decoded| decoded.name == event_name)
		.and_then(|decoded| decoded.arg(argument).map(render_value))
}
