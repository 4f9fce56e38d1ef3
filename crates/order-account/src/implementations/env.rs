//! Environment variable credential provider.

use crate::{CredentialError, CredentialInterface};
use async_trait::async_trait;
use order_types::{non_empty_string, ConfigSchema, Field, FieldType, Schema};
use secrecy::SecretString;

const DEFAULT_VARIABLE: &str = "WALLET_KEY";

/// Reads the signing key from an environment variable.
pub struct EnvCredentials {
	variable: String,
}

impl EnvCredentials {
	pub fn new(variable: impl Into<String>) -> Self {
		Self {
			variable: variable.into(),
		}
	}
}

/// Configuration schema for EnvCredentials.
pub struct EnvCredentialSchema;

impl ConfigSchema for EnvCredentialSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), order_types::ValidationError> {
		let schema = Schema::new(
			vec![],
			vec![Field::new("variable", FieldType::String).with_validator(non_empty_string)],
		);

		schema.validate(config)
	}
}

#[async_trait]
impl CredentialInterface for EnvCredentials {
	fn secret_name(&self) -> String {
		format!("env:{}", self.variable)
	}

	async fn fetch(&self) -> Result<SecretString, CredentialError> {
		match std::env::var(&self.variable) {
			Ok(value) if !value.trim().is_empty() => Ok(SecretString::new(value.trim().to_string())),
			Ok(_) => Err(CredentialError::Unavailable {
				secret: self.secret_name(),
				reason: format!("environment variable {} is empty", self.variable),
			}),
			Err(_) => Err(CredentialError::Unavailable {
				secret: self.secret_name(),
				reason: format!("environment variable {} is not set", self.variable),
			}),
		}
	}
}

/// Factory function to create an environment credential provider.
///
/// Configuration parameters:
/// - `variable`: name of the variable holding the key (default: "WALLET_KEY")
pub fn create_provider(config: &toml::Value) -> Box<dyn CredentialInterface> {
	let variable = config
		.get("variable")
		.and_then(|v| v.as_str())
		.unwrap_or(DEFAULT_VARIABLE);

	Box::new(EnvCredentials::new(variable))
}
