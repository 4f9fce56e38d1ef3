//! Point-in-time router quotes.

use crate::U256;
use chrono::{DateTime, Utc};

/// Projected output of the configured swap, observed at a moment in time.
///
/// Quotes are ephemeral; the supervisor replaces the previous one on every
/// poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
	/// Output of the final hop in the buy token's smallest unit.
	pub amount_out: U256,
	/// Wall-clock time the quote was taken.
	pub observed_at: DateTime<Utc>,
}

impl Quote {
	pub fn new(amount_out: U256) -> Self {
		Self {
			amount_out,
			observed_at: Utc::now(),
		}
	}
}
