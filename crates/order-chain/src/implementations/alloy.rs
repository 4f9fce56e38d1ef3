//! Alloy-based implementation of the chain interface.

use crate::contracts::IERC20;
use crate::{ChainError, ChainInterface};
use alloy::eips::BlockNumberOrTag;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use order_types::{Address, Bytes, CallRequest, U256};
use tracing::debug;

/// Reads chain state over an HTTP JSON-RPC endpoint.
pub struct AlloyChain {
	provider: DynProvider,
}

impl AlloyChain {
	/// Connects to the JSON-RPC endpoint at `rpc_url`.
	///
	/// No request is made until the first read.
	pub fn new(rpc_url: &str) -> Result<Self, ChainError> {
		if !(rpc_url.starts_with("http://") || rpc_url.starts_with("https://")) {
			return Err(ChainError::InvalidEndpoint(format!(
				"RPC URL must start with http:// or https://, got {}",
				rpc_url
			)));
		}

		let url = rpc_url
			.parse::<reqwest::Url>()
			.map_err(|e| ChainError::InvalidEndpoint(format!("Invalid RPC URL: {}", e)))?;

		let provider = ProviderBuilder::new().connect_http(url).erased();

		Ok(Self { provider })
	}

	async fn erc20_call(&self, token: Address, data: Vec<u8>) -> Result<Bytes, ChainError> {
		self.call(&CallRequest {
			from: None,
			to: token,
			data: data.into(),
		})
		.await
	}
}

/// Classifies an RPC failure: execution reverts surface as error responses.
fn map_call_error(error: impl std::fmt::Display) -> ChainError {
	let message = error.to_string();
	if message.contains("revert") {
		ChainError::Reverted(message)
	} else {
		ChainError::Network(message)
	}
}

#[async_trait]
impl ChainInterface for AlloyChain {
	async fn nonce(&self, account: Address) -> Result<u64, ChainError> {
		self.provider
			.get_transaction_count(account)
			.await
			.map_err(|e| ChainError::Network(format!("Failed to get nonce: {}", e)))
	}

	async fn native_balance(&self, account: Address) -> Result<U256, ChainError> {
		self.provider
			.get_balance(account)
			.await
			.map_err(|e| ChainError::Network(format!("Failed to get balance: {}", e)))
	}

	async fn token_balance(&self, token: Address, account: Address) -> Result<U256, ChainError> {
		let output = self
			.erc20_call(token, IERC20::balanceOfCall { account }.abi_encode())
			.await?;

		IERC20::balanceOfCall::abi_decode_returns(&output)
			.map_err(|e| ChainError::Decode(format!("balanceOf: {}", e)))
	}

	async fn allowance(
		&self,
		token: Address,
		owner: Address,
		spender: Address,
	) -> Result<U256, ChainError> {
		let output = self
			.erc20_call(token, IERC20::allowanceCall { owner, spender }.abi_encode())
			.await?;

		IERC20::allowanceCall::abi_decode_returns(&output)
			.map_err(|e| ChainError::Decode(format!("allowance: {}", e)))
	}

	async fn latest_block_timestamp(&self) -> Result<u64, ChainError> {
		let block = self
			.provider
			.get_block_by_number(BlockNumberOrTag::Latest)
			.await
			.map_err(|e| ChainError::Network(format!("Failed to get block: {}", e)))?
			.ok_or_else(|| ChainError::Network("Latest block not available".to_string()))?;

		Ok(block.header.timestamp)
	}

	async fn call(&self, request: &CallRequest) -> Result<Bytes, ChainError> {
		let mut tx = TransactionRequest::default()
			.to(request.to)
			.input(TransactionInput::new(request.data.clone()));
		if let Some(from) = request.from {
			tx = tx.from(from);
		}

		debug!(to = %request.to, "eth_call");

		self.provider.call(tx).await.map_err(map_call_error)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_rejects_non_http_endpoint() {
		assert!(matches!(
			AlloyChain::new("ws://localhost:8546"),
			Err(ChainError::InvalidEndpoint(_))
		));
	}

	#[test]
	fn test_accepts_http_endpoint() {
		assert!(AlloyChain::new("http://localhost:8545").is_ok());
	}

	#[test]
	fn test_revert_classification() {
		assert!(matches!(
			map_call_error("server returned an error response: execution reverted: UniswapV2Library: INSUFFICIENT_LIQUIDITY"),
			ChainError::Reverted(_)
		));
		assert!(matches!(
			map_call_error("error sending request"),
			ChainError::Network(_)
		));
	}
}
