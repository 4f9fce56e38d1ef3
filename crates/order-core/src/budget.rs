use chrono::{DateTime, Utc};
use order_types::MaxRuntime;
use std::time::Duration;
use tokio::time::Instant;

/// How long an order may keep monitoring.
///
/// Measured on the monotonic clock; the wall-clock expiry is for display.
#[derive(Debug, Clone, Copy)]
pub struct RunBudget {
	started: Instant,
	expires: Option<Instant>,
	started_at: DateTime<Utc>,
	limit: Option<Duration>,
}

impl RunBudget {
	/// Starts the budget now. An all-zero runtime never expires.
	pub fn start(runtime: &MaxRuntime) -> Self {
		let started = Instant::now();
		let limit = runtime.total();

		Self {
			started,
			expires: limit.and_then(|limit| started.checked_add(limit)),
			started_at: Utc::now(),
			limit,
		}
	}

	pub fn is_expired(&self) -> bool {
		self.expires
			.map(|expires| Instant::now() >= expires)
			.unwrap_or(false)
	}

	pub fn elapsed(&self) -> Duration {
		self.started.elapsed()
	}

	/// Wall-clock expiry, `None` when unbounded.
	pub fn expires_at(&self) -> Option<DateTime<Utc>> {
		let limit = chrono::Duration::from_std(self.limit?).ok()?;
		self.started_at.checked_add_signed(limit)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test(start_paused = true)]
	async fn test_unbounded_never_expires() {
		let budget = RunBudget::start(&MaxRuntime::default());
		tokio::time::advance(Duration::from_secs(10 * 365 * 86_400)).await;

		assert!(!budget.is_expired());
		assert_eq!(budget.expires_at(), None);
	}

	#[tokio::test(start_paused = true)]
	async fn test_expires_at_start_plus_runtime() {
		let runtime = MaxRuntime {
			days: 1,
			months: 0,
			years: 0,
		};
		let budget = RunBudget::start(&runtime);

		tokio::time::advance(Duration::from_secs(86_399)).await;
		assert!(!budget.is_expired());

		tokio::time::advance(Duration::from_secs(1)).await;
		assert!(budget.is_expired());
		assert_eq!(budget.elapsed(), Duration::from_secs(86_400));
	}

	#[test]
	fn test_wall_clock_expiry() {
		let runtime = MaxRuntime {
			days: 2,
			months: 1,
			years: 0,
		};
		let budget = RunBudget::start(&runtime);
		let expires_at = budget.expires_at().unwrap();

		assert_eq!(
			expires_at - budget.started_at,
			chrono::Duration::days(32)
		);
	}
}
