use order_builder::BuildError;
use order_delivery::SubmitError;
use order_pricing::QuoteError;
use thiserror::Error;

/// Failures of an order's lifecycle.
///
/// Only startup failures are fatal. Everything raised inside a monitoring
/// cycle is logged by the supervisor and monitoring resumes.
#[derive(Error, Debug)]
pub enum OrderError {
	#[error("Invalid configuration: {0}")]
	ConfigInvalid(String),

	#[error("Credential unavailable: {0}")]
	CredentialUnavailable(String),

	#[error("Insufficient balance: need {need}, have {have}")]
	InsufficientBalance { need: String, have: String },

	#[error("Quote unavailable: {0}")]
	QuoteUnavailable(String),

	#[error("State read failed: {0}")]
	StateReadError(String),

	#[error("Simulation rejected: {0}")]
	SimulationRejected(String),

	#[error("Bundle submission failed: {0}")]
	SubmissionError(String),

	#[error("Signing failed: {0}")]
	Signing(String),
}

impl From<QuoteError> for OrderError {
	fn from(error: QuoteError) -> Self {
		match error {
			QuoteError::Unavailable(reason) => OrderError::QuoteUnavailable(reason),
		}
	}
}

impl From<BuildError> for OrderError {
	fn from(error: BuildError) -> Self {
		match error {
			BuildError::StateRead(reason) => OrderError::StateReadError(reason),
			BuildError::Signing(reason) => OrderError::Signing(reason),
			BuildError::Amount(e) => OrderError::ConfigInvalid(e.to_string()),
		}
	}
}

impl From<SubmitError> for OrderError {
	fn from(error: SubmitError) -> Self {
		match error {
			SubmitError::SimulationRejected(reason) => OrderError::SimulationRejected(reason),
			SubmitError::Submission(e) => OrderError::SubmissionError(e.to_string()),
		}
	}
}
