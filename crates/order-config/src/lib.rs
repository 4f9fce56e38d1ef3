//! Configuration loading for the limit order service.
//!
//! Configuration is a typed document (TOML, JSON or YAML) with `${VAR}`
//! placeholders resolved from the environment. Loading validates every range
//! the order depends on, so a config that loads is one the supervisor can
//! run.

use thiserror::Error;

mod loader;
mod types;

pub use loader::{ConfigFormat, ConfigLoader};
pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}
