//! Read-only chain access for the limit order service.
//!
//! The order never writes to the chain directly; every write goes through the
//! relay as a bundle. This crate covers the reads an order needs: account
//! nonce, balances, allowance, block time and `eth_call` simulation.

use async_trait::async_trait;
use order_types::{Address, Bytes, CallRequest, U256};
use thiserror::Error;

pub mod contracts;

/// Re-export implementations
pub mod implementations {
	pub mod alloy;
}

pub use implementations::alloy::AlloyChain;

/// Errors that can occur while reading chain state.
#[derive(Debug, Error)]
pub enum ChainError {
	#[error("Network error: {0}")]
	Network(String),
	/// The call executed and reverted.
	#[error("Call reverted: {0}")]
	Reverted(String),
	#[error("Decode error: {0}")]
	Decode(String),
	#[error("Invalid endpoint: {0}")]
	InvalidEndpoint(String),
}

/// Trait defining the read-only RPC surface used by an order.
#[async_trait]
pub trait ChainInterface: Send + Sync {
	/// Current transaction count of `account`.
	async fn nonce(&self, account: Address) -> Result<u64, ChainError>;

	/// Native currency balance in wei.
	async fn native_balance(&self, account: Address) -> Result<U256, ChainError>;

	/// ERC-20 balance of `account` in the token's smallest unit.
	async fn token_balance(&self, token: Address, account: Address) -> Result<U256, ChainError>;

	/// ERC-20 allowance granted by `owner` to `spender`.
	async fn allowance(
		&self,
		token: Address,
		owner: Address,
		spender: Address,
	) -> Result<U256, ChainError>;

	/// Timestamp of the latest block, in seconds.
	async fn latest_block_timestamp(&self) -> Result<u64, ChainError>;

	/// Executes a call against the latest state and returns its output.
	async fn call(&self, request: &CallRequest) -> Result<Bytes, ChainError>;
}
