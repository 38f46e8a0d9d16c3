//! Schema validation for implementation-specific TOML tables.
//!
//! Pluggable backends keep their settings as raw `toml::Value` tables in the
//! main configuration. Each backend describes the table it expects with a
//! [`Schema`] and checks it through [`ConfigSchema`] before it is built.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
	#[error("Missing required field: {0}")]
	MissingField(String),
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: &'static str,
		actual: String,
	},
}

/// Expected type of a configuration field.
#[derive(Debug, Clone, Copy)]
pub enum FieldType {
	String,
	/// Integer with optional inclusive bounds.
	Integer { min: Option<i64>, max: Option<i64> },
}

/// Extra check run after the type check passes.
pub type FieldValidator = Box<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

pub struct Field {
	pub name: String,
	pub field_type: FieldType,
	pub validator: Option<FieldValidator>,
}

impl std::fmt::Debug for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("field_type", &self.field_type)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl Field {
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			validator: None,
		}
	}

	/// Attaches a check that returns an error message on failure.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}

	fn invalid(&self, message: String) -> ValidationError {
		ValidationError::InvalidValue {
			field: self.name.clone(),
			message,
		}
	}

	fn mismatch(&self, expected: &'static str, value: &toml::Value) -> ValidationError {
		ValidationError::TypeMismatch {
			field: self.name.clone(),
			expected,
			actual: value.type_str().to_string(),
		}
	}

	fn check(&self, value: &toml::Value) -> Result<(), ValidationError> {
		match self.field_type {
			FieldType::String if !value.is_str() => return Err(self.mismatch("string", value)),
			FieldType::String => {},
			FieldType::Integer { min, max } => {
				let n = value
					.as_integer()
					.ok_or_else(|| self.mismatch("integer", value))?;
				if let Some(min) = min.filter(|min| n < *min) {
					return Err(self.invalid(format!("Value {n} is less than minimum {min}")));
				}
				if let Some(max) = max.filter(|max| n > *max) {
					return Err(self.invalid(format!("Value {n} is greater than maximum {max}")));
				}
			},
		}

		match &self.validator {
			Some(validator) => validator(value).map_err(|message| self.invalid(message)),
			None => Ok(()),
		}
	}
}

/// Required and optional fields of a TOML table.
#[derive(Debug)]
pub struct Schema {
	pub required: Vec<Field>,
	pub optional: Vec<Field>,
}

impl Schema {
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	/// Validates `config`, which must be a table.
	///
	/// Optional fields are only checked when present. Unknown keys are ignored.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config.as_table().ok_or_else(|| ValidationError::TypeMismatch {
			field: "root".to_string(),
			expected: "table",
			actual: config.type_str().to_string(),
		})?;

		for field in &self.required {
			match table.get(&field.name) {
				Some(value) => field.check(value)?,
				None => return Err(ValidationError::MissingField(field.name.clone())),
			}
		}
		for field in &self.optional {
			if let Some(value) = table.get(&field.name) {
				field.check(value)?;
			}
		}
		Ok(())
	}
}

/// A configuration schema that can validate TOML values.
pub trait ConfigSchema: Send + Sync {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}
