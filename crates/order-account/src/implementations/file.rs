//! Secret document credential provider.
//!
//! Secret stores hand back a JSON object of named values, for example
//! `{"WALLET_KEY": "0x..."}`. This provider reads such a document from disk,
//! typically a file materialized by the deployment's secret agent.

use crate::{CredentialError, CredentialInterface};
use async_trait::async_trait;
use order_types::{non_empty_string, ConfigSchema, Field, FieldType, Schema};
use secrecy::SecretString;
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_KEY_FIELD: &str = "WALLET_KEY";
const DEFAULT_SECRET_NAME: &str = "limit-order-bot/wallet-key";

/// Reads the signing key from one field of a JSON secret document.
pub struct FileCredentials {
	path: PathBuf,
	key_field: String,
	secret_name: String,
}

impl FileCredentials {
	pub fn new(path: PathBuf, key_field: impl Into<String>, secret_name: impl Into<String>) -> Self {
		Self {
			path,
			key_field: key_field.into(),
			secret_name: secret_name.into(),
		}
	}

	fn unavailable(&self, reason: String) -> CredentialError {
		CredentialError::Unavailable {
			secret: self.secret_name.clone(),
			reason,
		}
	}
}

/// Configuration schema for FileCredentials.
pub struct FileCredentialSchema;

impl ConfigSchema for FileCredentialSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), order_types::ValidationError> {
		let schema = Schema::new(
			// Required fields
			vec![Field::new("path", FieldType::String).with_validator(non_empty_string)],
			// Optional fields
			vec![
				Field::new("key_field", FieldType::String).with_validator(non_empty_string),
				Field::new("secret_name", FieldType::String).with_validator(non_empty_string),
			],
		);

		schema.validate(config)
	}
}

#[async_trait]
impl CredentialInterface for FileCredentials {
	fn secret_name(&self) -> String {
		self.secret_name.clone()
	}

	async fn fetch(&self) -> Result<SecretString, CredentialError> {
		debug!(path = %self.path.display(), "Reading secret document");

		let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
			self.unavailable(format!("cannot read {}: {}", self.path.display(), e))
		})?;

		let document: serde_json::Value = serde_json::from_str(&content)
			.map_err(|e| self.unavailable(format!("secret document is not valid JSON: {}", e)))?;

		match document.get(&self.key_field).and_then(|v| v.as_str()) {
			Some(key) if !key.trim().is_empty() => Ok(SecretString::new(key.trim().to_string())),
			_ => Err(self.unavailable(format!(
				"secret document has no non-empty '{}' field",
				self.key_field
			))),
		}
	}
}

/// Factory function to create a file credential provider.
///
/// Configuration parameters:
/// - `path`: location of the JSON secret document (required)
/// - `key_field`: field holding the key (default: "WALLET_KEY")
/// - `secret_name`: name used in error messages (default: "limit-order-bot/wallet-key")
pub fn create_provider(config: &toml::Value) -> Box<dyn CredentialInterface> {
	let path = config
		.get("path")
		.and_then(|v| v.as_str())
		.unwrap_or_default();
	let key_field = config
		.get("key_field")
		.and_then(|v| v.as_str())
		.unwrap_or(DEFAULT_KEY_FIELD);
	let secret_name = config
		.get("secret_name")
		.and_then(|v| v.as_str())
		.unwrap_or(DEFAULT_SECRET_NAME);

	Box::new(FileCredentials::new(
		PathBuf::from(path),
		key_field,
		secret_name,
	))
}
