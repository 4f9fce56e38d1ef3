//! The order's control loop.

use crate::{OrderError, OrderState, RunBudget};
use alloy::primitives::utils::{format_ether, format_units};
use order_account::AccountService;
use order_builder::TransactionBuilder;
use order_chain::ChainInterface;
use order_delivery::{BundleSubmitter, BundleTracker, RelayInterface, TrackOutcome};
use order_pricing::{Decision, QuoteInterface, QuoteService, ThresholdEvaluator};
use order_types::{Address, BundleStatus, OrderConfig, Quote, U256};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{error, info, info_span, warn, Instrument};

/// Where the order's transactions go.
#[derive(Debug, Clone, Copy)]
pub struct NetworkParams {
	pub chain_id: u64,
	pub router: Address,
}

/// Why the control loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
	/// The swap landed on chain.
	Completed,
	/// The run budget ran out.
	Expired,
	/// A shutdown signal was observed.
	Interrupted,
}

/// Final report of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
	pub termination: Termination,
	/// Quotes taken.
	pub checks: u64,
	/// Bundles submitted.
	pub bundles: u32,
	pub elapsed: Duration,
}

/// Result of one execution attempt, seen from the loop.
enum Attempt {
	Completed,
	Resume,
	Interrupted,
}

/// Drives one limit order from startup to a terminal state.
pub struct OrderSupervisor {
	order: OrderConfig,
	account: Arc<AccountService>,
	chain: Arc<dyn ChainInterface>,
	quotes: QuoteService,
	evaluator: ThresholdEvaluator,
	builder: TransactionBuilder,
	submitter: BundleSubmitter,
	tracker: BundleTracker,
	amount_in: U256,
	state: OrderState,
}

impl OrderSupervisor {
	pub fn new(
		order: OrderConfig,
		account: Arc<AccountService>,
		chain: Arc<dyn ChainInterface>,
		quote_source: Box<dyn QuoteInterface>,
		relay: Arc<dyn RelayInterface>,
		network: NetworkParams,
	) -> Result<Self, OrderError> {
		let amount_in = order
			.amount_in()
			.map_err(|e| OrderError::ConfigInvalid(e.to_string()))?;
		let evaluator = ThresholdEvaluator::from_order(&order)
			.map_err(|e| OrderError::ConfigInvalid(e.to_string()))?;

		Ok(Self {
			quotes: QuoteService::new(quote_source, amount_in, order.swap_path()),
			builder: TransactionBuilder::new(
				chain.clone(),
				account.clone(),
				order.clone(),
				network.router,
				network.chain_id,
			),
			submitter: BundleSubmitter::new(chain.clone(), relay.clone()),
			tracker: BundleTracker::new(relay, order.bundle_check_delay, order.max_bundle_checks),
			evaluator,
			amount_in,
			order,
			account,
			chain,
			state: OrderState::Monitoring,
		})
	}

	pub fn state(&self) -> OrderState {
		self.state
	}

	fn transition(&mut self, to: OrderState) {
		if self.state.can_transition_to(to) {
			info!(from = %self.state, to = %to, "Order state changed");
		} else {
			error!(from = %self.state, to = %to, "Unexpected order state transition");
		}
		self.state = to;
	}

	/// Verifies balances and reports the order terms.
	async fn preflight(&self) -> Result<(), OrderError> {
		let owner = self
			.account
			.get_address()
			.await
			.map_err(|e| OrderError::Signing(e.to_string()))?;

		let token_balance = self
			.chain
			.token_balance(self.order.sell_token, owner)
			.await
			.map_err(|e| OrderError::StateReadError(format!("sell token balance: {}", e)))?;
		let native_balance = self
			.chain
			.native_balance(owner)
			.await
			.map_err(|e| OrderError::StateReadError(format!("native balance: {}", e)))?;

		let sell_decimals = self.order.sell_token_decimals;
		info!(
			account = %owner,
			sell_token_balance = %human(token_balance, sell_decimals),
			native_balance = %format_ether(native_balance),
			"Initial balances"
		);

		if token_balance < self.amount_in {
			return Err(OrderError::InsufficientBalance {
				need: human(self.amount_in, sell_decimals),
				have: human(token_balance, sell_decimals),
			});
		}

		let gas_reserve = self.order.max_gas_cost_wei();
		if native_balance < gas_reserve {
			warn!(
				native_balance = %format_ether(native_balance),
				required = %format_ether(gas_reserve),
				"Native balance does not cover bundle gas; the relay will reject the bundle"
			);
		}

		Ok(())
	}

	/// Runs the order until it completes, expires or `shutdown` fires.
	///
	/// Startup failures are returned as errors. Failures inside a cycle are
	/// logged and monitoring resumes.
	pub async fn run(
		&mut self,
		mut shutdown: broadcast::Receiver<()>,
	) -> Result<RunOutcome, OrderError> {
		self.preflight().await?;

		let budget = RunBudget::start(&self.order.max_runtime);
		let target = self.order.target_price;
		info!(
			sell_amount = %self.order.sell_amount,
			sell_decimals = self.order.sell_token_decimals,
			buy_decimals = self.order.buy_token_decimals,
			target = %target,
			min_acceptable = %self.human_out(self.evaluator.min_acceptable()),
			interval_secs = self.order.check_interval.as_secs(),
			max_runtime = %self.order.max_runtime.describe(),
			expires_at = %budget
				.expires_at()
				.map(|at| at.to_rfc3339())
				.unwrap_or_else(|| "never".to_string()),
			"Starting price monitoring"
		);

		let mut checks: u64 = 0;
		let mut bundles: u32 = 0;

		let termination = loop {
			if budget.is_expired() {
				self.transition(OrderState::Expired);
				warn!(elapsed_secs = budget.elapsed().as_secs(), checks, "Max runtime exceeded");
				break Termination::Expired;
			}

			let Some(result) = interruptible(&mut shutdown, self.quotes.current()).await else {
				break Termination::Interrupted;
			};
			checks += 1;

			match result.map_err(OrderError::from) {
				Ok(quote) => {
					self.report_quote(checks, &quote);

					if self.evaluator.evaluate(&quote) == Decision::Execute {
						info!(
							check = checks,
							quote = %self.human_out(quote.amount_out),
							target = %target,
							"Target price met, executing order"
						);

						let span = info_span!("attempt", id = %uuid::Uuid::new_v4(), check = checks);
						match self
							.attempt(&mut shutdown, &mut bundles, checks, &budget)
							.instrument(span)
							.await
						{
							Attempt::Completed => break Termination::Completed,
							Attempt::Interrupted => break Termination::Interrupted,
							Attempt::Resume => {}
						}
					}
				}
				Err(e) => warn!(check = checks, error = %e, "Could not fetch price, retrying"),
			}

			let sleep = tokio::time::sleep(self.order.check_interval);
			if interruptible(&mut shutdown, sleep).await.is_none() {
				break Termination::Interrupted;
			}
		};

		let outcome = RunOutcome {
			termination,
			checks,
			bundles,
			elapsed: budget.elapsed(),
		};
		info!(
			outcome = ?outcome.termination,
			checks = outcome.checks,
			bundles = outcome.bundles,
			elapsed_secs = outcome.elapsed.as_secs(),
			"Order monitor stopped"
		);

		Ok(outcome)
	}

	/// Builds, submits and tracks one bundle.
	async fn attempt(
		&mut self,
		shutdown: &mut broadcast::Receiver<()>,
		bundles: &mut u32,
		checks: u64,
		budget: &RunBudget,
	) -> Attempt {
		self.transition(OrderState::Executing);

		// Neither building nor submitting is interrupted part-way.
		let submitted = match self.builder.build(self.evaluator.min_acceptable()).await {
			Ok(set) => self.submitter.submit(&set).await.map_err(OrderError::from),
			Err(e) => Err(OrderError::from(e)),
		};

		let hash = match submitted {
			Ok(hash) => hash,
			Err(e) => {
				warn!(error = %e, "Execution attempt aborted, nothing was submitted");
				self.transition(OrderState::Monitoring);
				return Attempt::Resume;
			}
		};
		*bundles += 1;

		self.transition(OrderState::Tracking);
		let Some(outcome) = interruptible(shutdown, self.tracker.track(&hash)).await else {
			warn!(bundle_hash = %hash, "Interrupted while tracking; verify the bundle manually");
			return Attempt::Interrupted;
		};

		match outcome {
			TrackOutcome::Included(_) => {
				self.transition(OrderState::Completed);
				info!(bundle_hash = %hash, "Trade executed on chain");
				Attempt::Completed
			}
			TrackOutcome::Rejected(stats) => {
				warn!(
					bundle_hash = %hash,
					status = %stats.status,
					"Bundle was not included; no funds were spent"
				);
				if stats.status == BundleStatus::ExcludedFromBlock {
					warn!(
						gas_price_gwei = %format_units(U256::from(self.order.gas_price_wei), "gwei")
							.unwrap_or_default(),
						"Consider raising the gas price"
					);
				}
				self.transition(OrderState::Monitoring);
				Attempt::Resume
			}
			TrackOutcome::Unresolved {
				checks: status_checks,
				last,
			} => {
				warn!(
					bundle_hash = %hash,
					status_checks,
					last_status = %last,
					checks,
					elapsed_secs = budget.elapsed().as_secs(),
					"Bundle outcome unresolved; check the account manually before relying on it"
				);
				self.transition(OrderState::Monitoring);
				Attempt::Resume
			}
		}
	}

	fn report_quote(&self, check: u64, quote: &Quote) {
		info!(
			check,
			observed_at = %quote.observed_at.format("%Y-%m-%d %H:%M:%S"),
			quote = %self.human_out(quote.amount_out),
			percent_of_target = %self
				.evaluator
				.percent_of_target(quote)
				.unwrap_or_else(|| "n/a".to_string()),
			"Price check"
		);
	}

	fn human_out(&self, amount: U256) -> String {
		human(amount, self.order.buy_token_decimals)
	}
}

fn human(amount: U256, decimals: u8) -> String {
	format_units(amount, decimals).unwrap_or_else(|_| amount.to_string())
}

/// Awaits `future` unless shutdown is signalled first.
///
/// A closed channel counts as a shutdown signal.
async fn interruptible<F: Future>(
	shutdown: &mut broadcast::Receiver<()>,
	future: F,
) -> Option<F::Output> {
	tokio::select! {
		biased;
		_ = shutdown.recv() => {
			info!("Shutdown signal received");
			None
		}
		output = future => Some(output),
	}
}
