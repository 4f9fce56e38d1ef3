//! Threshold evaluation for quotes.

use order_types::{ratio_bps, AmountError, OrderConfig, Quote, U256};

/// Outcome of evaluating one quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
	/// The quote meets the threshold; build and submit the bundle.
	Execute,
	/// Keep monitoring.
	Wait,
}

/// Compares quotes against the order's minimum acceptable output.
///
/// The threshold is computed once from the order terms and never changes, so
/// the decision is a pure function of the quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdEvaluator {
	min_acceptable: U256,
	target: U256,
}

impl ThresholdEvaluator {
	pub fn new(min_acceptable: U256, target: U256) -> Self {
		Self {
			min_acceptable,
			target,
		}
	}

	pub fn from_order(order: &OrderConfig) -> Result<Self, AmountError> {
		Ok(Self::new(order.min_acceptable()?, order.target_units()?))
	}

	/// Minimum output that triggers execution, in the buy token's smallest unit.
	pub fn min_acceptable(&self) -> U256 {
		self.min_acceptable
	}

	pub fn evaluate(&self, quote: &Quote) -> Decision {
		if quote.amount_out >= self.min_acceptable {
			Decision::Execute
		} else {
			Decision::Wait
		}
	}

	/// Quote as a percentage of the face-value target, two decimals.
	pub fn percent_of_target(&self, quote: &Quote) -> Option<String> {
		let bps = ratio_bps(quote.amount_out, self.target)?;
		let bps: u128 = bps.try_into().ok()?;
		Some(format!("{}.{:02}%", bps / 100, bps % 100))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use order_types::{Address, MaxRuntime};
	use rust_decimal::Decimal;
	use std::str::FromStr;
	use std::time::Duration;

	fn e18(n: u64) -> U256 {
		U256::from(n) * U256::from(10u64).pow(U256::from(18))
	}

	fn order(target: &str, slippage: &str) -> OrderConfig {
		OrderConfig {
			sell_token: Address::repeat_byte(1),
			buy_token: Address::repeat_byte(3),
			intermediate_token: Address::repeat_byte(2),
			sell_amount: Decimal::from(100),
			sell_token_decimals: 6,
			buy_token_decimals: 18,
			target_price: Decimal::from_str(target).unwrap(),
			max_slippage_percent: Decimal::from_str(slippage).unwrap(),
			check_interval: Duration::from_secs(60),
			max_runtime: MaxRuntime::default(),
			gas_price_wei: 30_000_000_000,
			approve_gas_limit: 80_000,
			swap_gas_limit: 500_000,
			bundle_check_delay: Duration::from_secs(10),
			max_bundle_checks: 10,
		}
	}

	#[test]
	fn test_quote_at_target_triggers() {
		let evaluator = ThresholdEvaluator::from_order(&order("2000", "0")).unwrap();
		assert_eq!(evaluator.min_acceptable(), e18(2000));
		assert_eq!(evaluator.evaluate(&Quote::new(e18(2000))), Decision::Execute);
		assert_eq!(
			evaluator.percent_of_target(&Quote::new(e18(2000))).as_deref(),
			Some("100.00%")
		);
	}

	#[test]
	fn test_quote_below_target_waits() {
		let evaluator = ThresholdEvaluator::from_order(&order("2000", "0")).unwrap();
		let quote = Quote::new(e18(1999) + U256::from(99u64) * U256::from(10u64).pow(U256::from(16)));
		assert_eq!(evaluator.evaluate(&quote), Decision::Wait);
		assert_eq!(evaluator.percent_of_target(&quote).as_deref(), Some("99.99%"));
	}

	#[test]
	fn test_slippage_loosens_threshold() {
		let evaluator = ThresholdEvaluator::from_order(&order("2000", "0.5")).unwrap();
		assert_eq!(evaluator.min_acceptable(), e18(1990));
		assert_eq!(evaluator.evaluate(&Quote::new(e18(1990))), Decision::Execute);
		assert_eq!(evaluator.evaluate(&Quote::new(e18(1990) - U256::from(1u8))), Decision::Wait);
	}

	#[test]
	fn test_monotonic_in_quote() {
		let evaluator = ThresholdEvaluator::new(U256::from(1_000u64), U256::from(1_000u64));
		let mut triggered = false;
		for amount in (0u64..2_000).step_by(7) {
			let decision = evaluator.evaluate(&Quote::new(U256::from(amount)));
			if triggered {
				assert_eq!(decision, Decision::Execute, "regressed at {}", amount);
			}
			triggered = decision == Decision::Execute;
		}
		assert!(triggered);
	}

	#[test]
	fn test_percent_without_target() {
		let evaluator = ThresholdEvaluator::new(U256::ZERO, U256::ZERO);
		assert_eq!(evaluator.percent_of_target(&Quote::new(U256::from(5u8))), None);
	}
}
