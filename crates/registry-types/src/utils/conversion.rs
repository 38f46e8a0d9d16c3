//! Wallet address parsing and validation.

use super::formatting::{with_0x_prefix, without_0x_prefix};
use alloy_primitives::Address;

/// Parses a wallet address string.
///
/// The input is 40 hex digits, with or without a `0x` prefix. All-lowercase
/// and all-uppercase digits are accepted as-is; mixed case is treated as an
/// EIP-55 checksum and must verify.
pub fn parse_address(input: &str) -> Result<Address, String> {
	let digits = without_0x_prefix(input.trim());
	if digits.len() != 40 {
		return Err(format!(
			"Invalid address length: expected 40 hex digits, got {}",
			digits.len()
		));
	}
	if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
		return Err(format!("Invalid address '{}': not hexadecimal", input));
	}

	let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
	let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
	if has_lower && has_upper {
		return Address::parse_checksummed(with_0x_prefix(digits), None)
			.map_err(|e| format!("Invalid address checksum '{}': {}", input, e));
	}

	let bytes = hex::decode(digits).map_err(|e| format!("Invalid hex: {}", e))?;
	Ok(Address::from_slice(&bytes))
}

#[cfg(test)]
mod tests {
	use super::*;

	const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

	#[test]
	fn test_parse_lowercase_and_uppercase() {
		let lower = parse_address(&CHECKSUMMED.to_lowercase()).unwrap();
		let upper = parse_address(&format!("0x{}", CHECKSUMMED[2..].to_uppercase())).unwrap();
		assert_eq!(lower, upper);
		assert_eq!(lower.to_checksum(None), CHECKSUMMED);
	}

	#[test]
	fn test_parse_valid_checksum() {
		let address = parse_address(CHECKSUMMED).unwrap();
		assert_eq!(address.to_checksum(None), CHECKSUMMED);
	}

	#[test]
	fn test_parse_without_prefix() {
		let expected = parse_address(CHECKSUMMED).unwrap();
		assert_eq!(parse_address(&CHECKSUMMED[2..]).unwrap(), expected);
		assert_eq!(parse_address(&CHECKSUMMED[2..].to_lowercase()).unwrap(), expected);
	}

	#[test]
	fn test_reject_bad_checksum() {
		// Flip the case of a single letter.
		let bad = CHECKSUMMED.replacen('a', "A", 1);
		assert!(parse_address(&bad).is_err());
		assert!(parse_address(&bad[2..]).is_err());
	}

	#[test]
	fn test_reject_malformed() {
		assert!(parse_address("").is_err());
		assert!(parse_address("not-an-address").is_err());
		assert!(parse_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1bea").is_err());
		assert!(parse_address("0xzzaeb6053f3e94c9b9a09f33669435e7ef1beaed").is_err());
	}

	#[test]
	fn test_zero_address_is_valid() {
		assert!(parse_address("0x0000000000000000000000000000000000000000").is_ok());
	}
}
