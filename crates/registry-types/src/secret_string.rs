//! Secret string wrapper for key material read from configuration.
//!
//! The value is wiped from memory on drop and never appears in `Debug` or
//! `Display` output. Callers reach the plaintext only through
//! [`SecretString::with_exposed`].

use std::fmt;
use zeroize::Zeroizing;

#[derive(Clone)]
pub struct SecretString(Zeroizing<String>);

impl SecretString {
	pub fn new(value: String) -> Self {
		Self(Zeroizing::new(value))
	}

	/// Runs `f` with the plaintext value.
	pub fn with_exposed<T>(&self, f: impl FnOnce(&str) -> T) -> T {
		f(self.0.as_str())
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self::new(value.to_string())
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("SecretString([REDACTED])")
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("[REDACTED]")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_secret_is_redacted() {
		let secret = SecretString::from("0xdeadbeef");
		assert_eq!(format!("{:?}", secret), "SecretString([REDACTED])");
		assert_eq!(secret.to_string(), "[REDACTED]");
	}

	#[test]
	fn test_with_exposed() {
		let secret = SecretString::from("hunter2");
		assert_eq!(secret.with_exposed(|s| s.len()), 7);
	}
}
