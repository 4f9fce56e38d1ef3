//! Router-backed quote source using `getAmountsOut`.

use crate::{QuoteError, QuoteInterface};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use order_chain::contracts::IUniswapV2Router;
use order_chain::ChainInterface;
use order_types::{Address, CallRequest, Quote, U256};
use std::sync::Arc;
use tracing::debug;

/// Quotes swaps by calling the router's `getAmountsOut` view.
pub struct RouterQuoteClient {
	chain: Arc<dyn ChainInterface>,
	router: Address,
}

impl RouterQuoteClient {
	pub fn new(chain: Arc<dyn ChainInterface>, router: Address) -> Self {
		Self { chain, router }
	}
}

#[async_trait]
impl QuoteInterface for RouterQuoteClient {
	async fn quote(&self, amount_in: U256, path: &[Address]) -> Result<Quote, QuoteError> {
		let call = IUniswapV2Router::getAmountsOutCall {
			amountIn: amount_in,
			path: path.to_vec(),
		};

		let output = self
			.chain
			.call(&CallRequest {
				from: None,
				to: self.router,
				data: call.abi_encode().into(),
			})
			.await
			.map_err(|e| QuoteError::Unavailable(e.to_string()))?;

		let amounts = IUniswapV2Router::getAmountsOutCall::abi_decode_returns(&output)
			.map_err(|e| QuoteError::Unavailable(format!("Malformed getAmountsOut output: {}", e)))?;

		let amount_out = amounts
			.last()
			.copied()
			.ok_or_else(|| QuoteError::Unavailable("Router returned no amounts".to_string()))?;

		debug!(%amount_in, %amount_out, hops = path.len(), "Router quote");

		Ok(Quote::new(amount_out))
	}
}
