//! Quote retrieval and threshold evaluation.
//!
//! A [`QuoteInterface`] projects the output of the order's swap; the
//! [`ThresholdEvaluator`] decides whether that projection is good enough to
//! execute.

use async_trait::async_trait;
use order_types::{Address, Quote, U256};
use thiserror::Error;

mod evaluator;

pub use evaluator::{Decision, ThresholdEvaluator};

/// Re-export implementations
pub mod implementations {
	pub mod router;
}

/// Errors that can occur while quoting.
#[derive(Debug, Error)]
pub enum QuoteError {
	/// Network failure or reverted call. Transient; the next poll retries.
	#[error("Quote unavailable: {0}")]
	Unavailable(String),
}

/// Trait defining the interface for quote sources.
#[async_trait]
pub trait QuoteInterface: Send + Sync {
	/// Projected output of the final hop of `path` for `amount_in`.
	async fn quote(&self, amount_in: U256, path: &[Address]) -> Result<Quote, QuoteError>;
}

/// Quotes one fixed input amount along one fixed path.
pub struct QuoteService {
	source: Box<dyn QuoteInterface>,
	amount_in: U256,
	path: Vec<Address>,
}

impl QuoteService {
	pub fn new(source: Box<dyn QuoteInterface>, amount_in: U256, path: Vec<Address>) -> Self {
		Self {
			source,
			amount_in,
			path,
		}
	}

	/// Fetches a fresh quote for the configured amount and path.
	pub async fn current(&self) -> Result<Quote, QuoteError> {
		self.source.quote(self.amount_in, &self.path).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::{Arc, Mutex};

	type Seen = Arc<Mutex<Vec<(U256, Vec<Address>)>>>;

	struct RecordingSource {
		seen: Seen,
	}

	#[async_trait]
	impl QuoteInterface for RecordingSource {
		async fn quote(&self, amount_in: U256, path: &[Address]) -> Result<Quote, QuoteError> {
			self.seen.lock().unwrap().push((amount_in, path.to_vec()));
			Ok(Quote::new(amount_in * U256::from(2u8)))
		}
	}

	#[tokio::test]
	async fn test_service_uses_fixed_amount_and_path() {
		let path = vec![
			Address::repeat_byte(1),
			Address::repeat_byte(2),
			Address::repeat_byte(3),
		];
		let seen = Seen::default();
		let service = QuoteService::new(
			Box::new(RecordingSource { seen: seen.clone() }),
			U256::from(100u8),
			path.clone(),
		);

		assert_eq!(service.current().await.unwrap().amount_out, U256::from(200u16));
		service.current().await.unwrap();

		let seen = seen.lock().unwrap();
		assert_eq!(seen.len(), 2);
		assert!(seen.iter().all(|(amount, p)| *amount == U256::from(100u8) && *p == path));
	}
}
