//! Contract bindings shared by the quote client and transaction builder.

use alloy::sol;

sol! {
	/// Minimal ERC-20 surface.
	interface IERC20 {
		function approve(address spender, uint256 amount) external returns (bool);
		function allowance(address owner, address spender) external view returns (uint256);
		function balanceOf(address account) external view returns (uint256);
	}

	/// Uniswap V2 style router.
	interface IUniswapV2Router {
		function getAmountsOut(uint256 amountIn, address[] calldata path) external view returns (uint256[] memory amounts);
		function swapExactTokensForTokens(
			uint256 amountIn,
			uint256 amountOutMin,
			address[] calldata path,
			address to,
			uint256 deadline
		) external returns (uint256[] memory amounts);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::{Address, U256};
	use alloy::sol_types::SolCall;

	#[test]
	fn test_selectors() {
		assert_eq!(IERC20::approveCall::SELECTOR, [0x09, 0x5e, 0xa7, 0xb3]);
		assert_eq!(IERC20::allowanceCall::SELECTOR, [0xdd, 0x62, 0xed, 0x3e]);
		assert_eq!(IERC20::balanceOfCall::SELECTOR, [0x70, 0xa0, 0x82, 0x31]);
		assert_eq!(
			IUniswapV2Router::getAmountsOutCall::SELECTOR,
			[0xd0, 0x6c, 0xa6, 0x1f]
		);
		assert_eq!(
			IUniswapV2Router::swapExactTokensForTokensCall::SELECTOR,
			[0x38, 0xed, 0x17, 0x39]
		);
	}

	#[test]
	fn test_balance_of_encoding() {
		let call = IERC20::balanceOfCall {
			account: Address::repeat_byte(0x11),
		};
		let data = call.abi_encode();
		assert_eq!(data.len(), 4 + 32);
		assert_eq!(&data[4 + 12..], Address::repeat_byte(0x11).as_slice());

		let output = U256::from(42u64).to_be_bytes::<32>();
		let decoded = IERC20::balanceOfCall::abi_decode_returns(&output).unwrap();
		assert_eq!(decoded, U256::from(42u64));
	}
}
