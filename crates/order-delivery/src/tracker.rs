use crate::RelayInterface;
use order_types::{BundleHash, BundleStats, BundleStatus};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, info_span, warn, Instrument};

/// How tracking a bundle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
	/// The bundle landed on chain.
	Included(BundleStats),
	/// The relay reported a terminal failure.
	Rejected(BundleStats),
	/// The check budget ran out without a terminal status.
	Unresolved { checks: u32, last: BundleStatus },
}

impl TrackOutcome {
	pub fn is_success(&self) -> bool {
		matches!(self, TrackOutcome::Included(_))
	}
}

/// Polls the relay for a bundle's status on a fixed cadence.
pub struct BundleTracker {
	relay: Arc<dyn RelayInterface>,
	delay: Duration,
	max_checks: u32,
}

impl BundleTracker {
	pub fn new(relay: Arc<dyn RelayInterface>, delay: Duration, max_checks: u32) -> Self {
		Self {
			relay,
			delay,
			max_checks,
		}
	}

	/// Follows `hash` until a terminal status or `max_checks` observations.
	///
	/// Each check waits `delay` first. A failed or empty status read counts
	/// as a `Pending` observation.
	pub async fn track(&self, hash: &BundleHash) -> TrackOutcome {
		let span = info_span!("bundle", bundle_hash = %hash);
		self.poll(hash).instrument(span).await
	}

	async fn poll(&self, hash: &BundleHash) -> TrackOutcome {
		info!(
			delay_secs = self.delay.as_secs(),
			max_checks = self.max_checks,
			"Tracking bundle status"
		);

		let mut last = BundleStatus::Pending;
		for check in 1..=self.max_checks {
			tokio::time::sleep(self.delay).await;

			let stats = match self.relay.get_bundle_stats(hash).await {
				Ok(Some(stats)) => stats,
				Ok(None) => {
					warn!(check, "No status yet (bundle may be too recent)");
					last = BundleStatus::Pending;
					continue;
				}
				Err(e) => {
					warn!(check, error = %e, "Could not fetch bundle status");
					last = BundleStatus::Pending;
					continue;
				}
			};

			info!(
				check,
				status = %stats.status,
				explanation = %stats.status.explanation(),
				error = stats.error.as_deref().unwrap_or(""),
				builder_payment = stats.builder_payment.as_deref().unwrap_or(""),
				"Bundle status"
			);

			if stats.status.is_success() {
				return TrackOutcome::Included(stats);
			}
			if stats.status.is_terminal() {
				return TrackOutcome::Rejected(stats);
			}
			last = stats.status;
		}

		warn!(
			checks = self.max_checks,
			waited_secs = self.delay.as_secs() * u64::from(self.max_checks),
			"Bundle status unclear after all checks; verify the account manually"
		);

		TrackOutcome::Unresolved {
			checks: self.max_checks,
			last,
		}
	}
}
