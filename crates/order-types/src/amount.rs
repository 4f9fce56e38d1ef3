//! Exact conversion between human-readable quantities and token base units.
//!
//! Quantities in configuration are decimals ("100", "1999.99", "0.5"). All
//! arithmetic against on-chain amounts happens on `U256` after scaling the
//! decimal's mantissa, so no precision is lost beyond the final truncation to
//! the smallest token unit.

use crate::U256;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while converting decimal quantities.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
	/// The quantity is below zero.
	#[error("Negative amount: {0}")]
	Negative(Decimal),
	/// A slippage percentage outside the inclusive [0, 100] range.
	#[error("Slippage {0}% is outside [0, 100]")]
	SlippageOutOfRange(Decimal),
	/// The scaled amount does not fit in 256 bits.
	#[error("Amount overflows 256 bits")]
	Overflow,
}

fn pow10(exp: u32) -> Result<U256, AmountError> {
	U256::from(10u8)
		.checked_pow(U256::from(exp))
		.ok_or(AmountError::Overflow)
}

fn mantissa(value: Decimal) -> U256 {
	U256::from(value.mantissa().unsigned_abs())
}

fn ensure_non_negative(value: Decimal) -> Result<(), AmountError> {
	if value.is_sign_negative() && !value.is_zero() {
		return Err(AmountError::Negative(value));
	}
	Ok(())
}

/// Converts a human quantity into base units: `floor(value × 10^decimals)`.
pub fn to_base_units(value: Decimal, decimals: u8) -> Result<U256, AmountError> {
	ensure_non_negative(value)?;

	let scaled = mantissa(value)
		.checked_mul(pow10(decimals.into())?)
		.ok_or(AmountError::Overflow)?;

	Ok(scaled / pow10(value.scale())?)
}

/// Minimum acceptable output in base units.
///
/// Computes `floor(target × (1 − slippage/100) × 10^decimals)` with integer
/// arithmetic only. Slippage can only loosen the threshold; a slippage of zero
/// yields the target at face value.
pub fn min_output_units(
	target: Decimal,
	slippage_percent: Decimal,
	decimals: u8,
) -> Result<U256, AmountError> {
	ensure_non_negative(target)?;
	if slippage_percent.is_sign_negative() && !slippage_percent.is_zero()
		|| slippage_percent > Decimal::ONE_HUNDRED
	{
		return Err(AmountError::SlippageOutOfRange(slippage_percent));
	}

	let target = target.normalize();
	let slippage = slippage_percent.normalize();

	let hundred = U256::from(100u8)
		.checked_mul(pow10(slippage.scale())?)
		.ok_or(AmountError::Overflow)?;
	let kept = hundred - mantissa(slippage);

	let numerator = mantissa(target)
		.checked_mul(kept)
		.and_then(|n| n.checked_mul(pow10(decimals.into()).ok()?))
		.ok_or(AmountError::Overflow)?;
	let denominator = pow10(target.scale())?
		.checked_mul(hundred)
		.ok_or(AmountError::Overflow)?;

	Ok(numerator / denominator)
}

/// Ratio of `value` to `reference` in basis points, `None` when the reference is zero.
pub fn ratio_bps(value: U256, reference: U256) -> Option<U256> {
	if reference.is_zero() {
		return None;
	}
	value.checked_mul(U256::from(10_000u32)).map(|v| v / reference)
}
