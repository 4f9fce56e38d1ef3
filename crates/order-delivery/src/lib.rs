//! Bundle delivery to a private block-builder relay.
//!
//! Delivery has three parts. A [`RelayInterface`] speaks the relay's JSON-RPC
//! dialect. The [`BundleSubmitter`] simulates the swap and then makes the
//! single bundle write. The [`BundleTracker`] polls the relay until the bundle
//! reaches a terminal status or the check budget runs out.

use async_trait::async_trait;
use order_types::{Bundle, BundleHash, BundleStats, B256};
use thiserror::Error;

mod submitter;
mod tracker;

pub use submitter::BundleSubmitter;
pub use tracker::{BundleTracker, TrackOutcome};

/// Re-export implementations
pub mod implementations {
	pub mod titan;
}

/// Errors that can occur while talking to the relay.
#[derive(Debug, Error)]
pub enum RelayError {
	#[error("Network error: {0}")]
	Network(String),
	/// JSON-RPC error object returned by the relay, verbatim.
	#[error("Relay error: {0}")]
	Rpc(String),
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
	#[error("Invalid endpoint: {0}")]
	InvalidEndpoint(String),
}

/// Errors that can occur while submitting a bundle.
#[derive(Debug, Error)]
pub enum SubmitError {
	/// The swap failed simulation; nothing was sent.
	#[error("Simulation rejected: {0}")]
	SimulationRejected(String),
	#[error("Submission failed: {0}")]
	Submission(#[from] RelayError),
}

/// Trait defining the interface for bundle relays.
#[async_trait]
pub trait RelayInterface: Send + Sync {
	/// Submits the bundle and returns the relay's identifier for it.
	async fn send_bundle(&self, bundle: &Bundle) -> Result<BundleHash, RelayError>;

	/// Latest status of a bundle, `None` when the relay has no data yet.
	async fn get_bundle_stats(&self, hash: &BundleHash) -> Result<Option<BundleStats>, RelayError>;

	/// Asks the relay to drop a privately submitted transaction.
	async fn cancel_private_transaction(&self, tx_hash: B256) -> Result<String, RelayError>;
}
