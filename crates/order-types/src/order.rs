//! Immutable order terms supplied at startup.

use crate::{amount, Address, AmountError, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
/// Calendar months are counted as 30 days.
const DAYS_PER_MONTH: u64 = 30;
/// Calendar years are counted as 365 days.
const DAYS_PER_YEAR: u64 = 365;

/// Maximum time an order keeps monitoring before it expires.
///
/// The components are summed; all zero means the order never expires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxRuntime {
	#[serde(default)]
	pub days: u32,
	#[serde(default)]
	pub months: u32,
	#[serde(default)]
	pub years: u32,
}

impl MaxRuntime {
	/// Total runtime, or `None` when unbounded.
	pub fn total(&self) -> Option<Duration> {
		let days = u64::from(self.days)
			+ u64::from(self.months) * DAYS_PER_MONTH
			+ u64::from(self.years) * DAYS_PER_YEAR;

		if days == 0 {
			None
		} else {
			Some(Duration::from_secs(days * SECONDS_PER_DAY))
		}
	}

	/// Human description such as "1 year(s), 2 day(s)" or "unlimited".
	pub fn describe(&self) -> String {
		let mut parts = Vec::new();
		if self.years > 0 {
			parts.push(format!("{} year(s)", self.years));
		}
		if self.months > 0 {
			parts.push(format!("{} month(s)", self.months));
		}
		if self.days > 0 {
			parts.push(format!("{} day(s)", self.days));
		}

		if parts.is_empty() {
			"unlimited".to_string()
		} else {
			parts.join(", ")
		}
	}
}

/// The full set of terms for one limit order.
///
/// Built once by the configuration loader and owned by the supervisor for the
/// process lifetime. Human quantities stay decimal; the accessor methods
/// convert them into base units.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderConfig {
	/// Token being sold.
	pub sell_token: Address,
	/// Token being bought.
	pub buy_token: Address,
	/// Intermediate hop of the swap path (wrapped native token).
	pub intermediate_token: Address,
	/// Sell amount in human units.
	pub sell_amount: Decimal,
	pub sell_token_decimals: u8,
	pub buy_token_decimals: u8,
	/// Minimum buy-token output in human units.
	pub target_price: Decimal,
	pub max_slippage_percent: Decimal,
	pub check_interval: Duration,
	pub max_runtime: MaxRuntime,
	/// Legacy gas price in wei applied to every transaction.
	pub gas_price_wei: u128,
	pub approve_gas_limit: u64,
	pub swap_gas_limit: u64,
	pub bundle_check_delay: Duration,
	pub max_bundle_checks: u32,
}

impl OrderConfig {
	/// Sell amount in the sell token's smallest unit.
	pub fn amount_in(&self) -> Result<U256, AmountError> {
		amount::to_base_units(self.sell_amount, self.sell_token_decimals)
	}

	/// Target output at face value in the buy token's smallest unit.
	pub fn target_units(&self) -> Result<U256, AmountError> {
		amount::to_base_units(self.target_price, self.buy_token_decimals)
	}

	/// Output floor after slippage, in the buy token's smallest unit.
	pub fn min_acceptable(&self) -> Result<U256, AmountError> {
		amount::min_output_units(
			self.target_price,
			self.max_slippage_percent,
			self.buy_token_decimals,
		)
	}

	/// Fixed two-hop path: sell → intermediate → buy.
	pub fn swap_path(&self) -> Vec<Address> {
		vec![self.sell_token, self.intermediate_token, self.buy_token]
	}

	/// Upper bound of native currency the bundle may spend on gas.
	pub fn max_gas_cost_wei(&self) -> U256 {
		U256::from(self.gas_price_wei)
			* U256::from(self.approve_gas_limit.saturating_add(self.swap_gas_limit))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_unbounded_runtime() {
		let runtime = MaxRuntime::default();
		assert_eq!(runtime.total(), None);
		assert_eq!(runtime.describe(), "unlimited");
	}

	#[test]
	fn test_runtime_components_sum() {
		let runtime = MaxRuntime {
			days: 2,
			months: 1,
			years: 1,
		};
		let expected_days = 2 + 30 + 365;
		assert_eq!(
			runtime.total(),
			Some(Duration::from_secs(expected_days * 86_400))
		);
		assert_eq!(runtime.describe(), "1 year(s), 1 month(s), 2 day(s)");
	}
}
