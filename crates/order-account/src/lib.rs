//! Signing identity for the limit order service.
//!
//! Two capabilities live here. A [`CredentialInterface`] fetches the signing
//! key from a secret store exactly once at startup. An [`AccountInterface`]
//! turns that key into an address and a signing operation, so callers never
//! touch raw key material.

use async_trait::async_trait;
use order_types::{Address, Bytes, ConfigSchema, Transaction, ValidationError, B256};
use secrecy::SecretString;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod env;
	pub mod file;
	pub mod local;
}

/// Errors that can occur while signing.
#[derive(Debug, Error)]
pub enum AccountError {
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// Errors that can occur while fetching key material.
#[derive(Debug, Error)]
pub enum CredentialError {
	/// The secret could not be read. Names the secret and the missing precondition.
	#[error("Secret '{secret}' unavailable: {reason}")]
	Unavailable { secret: String, reason: String },
	/// The provider's configuration table is invalid.
	#[error("Invalid credential configuration: {0}")]
	InvalidConfig(#[from] ValidationError),
	/// No provider with the requested name exists.
	#[error("Unknown credential provider: {0}")]
	UnknownProvider(String),
}

/// A signed transaction payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
	/// Hash of the signed transaction.
	pub hash: B256,
	/// EIP-2718 encoded bytes.
	pub raw: Bytes,
}

/// Trait defining the interface for secret providers.
///
/// A provider is asked for the key once; the returned secret is held in
/// memory only and never written anywhere.
#[async_trait]
pub trait CredentialInterface: Send + Sync {
	/// Name of the secret, for error reporting.
	fn secret_name(&self) -> String;

	/// Fetches the signing key material.
	async fn fetch(&self) -> Result<SecretString, CredentialError>;
}

/// Trait defining the interface for signing accounts.
#[async_trait]
pub trait AccountInterface: Send + Sync {
	async fn address(&self) -> Result<Address, AccountError>;

	/// Signs a legacy transaction and returns its encoded payload.
	async fn sign_transaction(&self, tx: &Transaction) -> Result<SignedPayload, AccountError>;
}

/// The order's signer identity: an address plus a signing capability.
pub struct AccountService {
	provider: Box<dyn AccountInterface>,
}

impl AccountService {
	pub fn new(provider: Box<dyn AccountInterface>) -> Self {
		Self { provider }
	}

	pub async fn get_address(&self) -> Result<Address, AccountError> {
		self.provider.address().await
	}

	pub async fn sign(&self, tx: &Transaction) -> Result<SignedPayload, AccountError> {
		self.provider.sign_transaction(tx).await
	}
}

/// Creates a credential provider by name, validating its configuration table.
///
/// Supported providers:
/// - `env`: reads the key from an environment variable
/// - `file`: reads the key from a JSON secret document on disk
pub fn create_credential_provider(
	provider: &str,
	config: &toml::Value,
) -> Result<Box<dyn CredentialInterface>, CredentialError> {
	match provider {
		"env" => {
			implementations::env::EnvCredentialSchema.validate(config)?;
			Ok(implementations::env::create_provider(config))
		}
		"file" => {
			implementations::file::FileCredentialSchema.validate(config)?;
			Ok(implementations::file::create_provider(config))
		}
		other => Err(CredentialError::UnknownProvider(other.to_string())),
	}
}
