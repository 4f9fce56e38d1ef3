//! Transaction construction for an execution attempt.
//!
//! The builder reads the account's nonce, the router allowance and the latest
//! block time, then produces an optional ERC-20 approval followed by the
//! swap, both signed by the order's account on consecutive nonces.

use alloy::sol_types::SolCall;
use order_account::AccountService;
use order_chain::contracts::{IUniswapV2Router, IERC20};
use order_chain::ChainInterface;
use order_types::{
	Address, AmountError, CallRequest, OrderConfig, SignedTransaction, SignedTransactionSet,
	Transaction, TransactionKind, U256,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Seconds after the latest block time at which the swap stops being valid.
pub const SWAP_DEADLINE_SECONDS: u64 = 300;

/// Errors that can occur while building a transaction set.
#[derive(Debug, Error)]
pub enum BuildError {
	/// Nonce, allowance or block lookup failed; nothing was signed.
	#[error("State read failed: {0}")]
	StateRead(String),
	#[error("Signing failed: {0}")]
	Signing(String),
	#[error("Amount error: {0}")]
	Amount(#[from] AmountError),
}

/// Chain state an attempt is built against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainSnapshot {
	/// Account nonce; the first transaction uses it.
	pub nonce: u64,
	/// Current router allowance over the sell token.
	pub allowance: U256,
	pub block_timestamp: u64,
}

/// Unsigned transactions of one attempt in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
	pub transactions: Vec<(TransactionKind, Transaction)>,
	/// The swap as a plain call, for simulation.
	pub swap_call: CallRequest,
}

/// Builds and signs the approval and swap transactions for an order.
pub struct TransactionBuilder {
	chain: Arc<dyn ChainInterface>,
	account: Arc<AccountService>,
	order: OrderConfig,
	router: Address,
	chain_id: u64,
}

impl TransactionBuilder {
	pub fn new(
		chain: Arc<dyn ChainInterface>,
		account: Arc<AccountService>,
		order: OrderConfig,
		router: Address,
		chain_id: u64,
	) -> Self {
		Self {
			chain,
			account,
			order,
			router,
			chain_id,
		}
	}

	/// Reads nonce, allowance and block time for `owner`.
	pub async fn snapshot(&self, owner: Address) -> Result<ChainSnapshot, BuildError> {
		let nonce = self
			.chain
			.nonce(owner)
			.await
			.map_err(|e| BuildError::StateRead(format!("nonce: {}", e)))?;
		let allowance = self
			.chain
			.allowance(self.order.sell_token, owner, self.router)
			.await
			.map_err(|e| BuildError::StateRead(format!("allowance: {}", e)))?;
		let block_timestamp = self
			.chain
			.latest_block_timestamp()
			.await
			.map_err(|e| BuildError::StateRead(format!("latest block: {}", e)))?;

		Ok(ChainSnapshot {
			nonce,
			allowance,
			block_timestamp,
		})
	}

	/// Lays out the attempt's transactions without touching the network.
	pub fn plan(
		&self,
		owner: Address,
		snapshot: &ChainSnapshot,
		min_out: U256,
	) -> Result<BuildPlan, BuildError> {
		let amount_in = self.order.amount_in()?;
		let mut nonce = snapshot.nonce;
		let mut transactions = Vec::with_capacity(2);

		if snapshot.allowance < amount_in {
			let data = IERC20::approveCall {
				spender: self.router,
				amount: amount_in,
			}
			.abi_encode();

			transactions.push((
				TransactionKind::Approval,
				self.transaction(self.order.sell_token, data, nonce, self.order.approve_gas_limit),
			));
			nonce += 1;
		} else {
			debug!(allowance = %snapshot.allowance, "Approval not needed");
		}

		let swap_data = IUniswapV2Router::swapExactTokensForTokensCall {
			amountIn: amount_in,
			amountOutMin: min_out,
			path: self.order.swap_path(),
			to: owner,
			deadline: U256::from(snapshot.block_timestamp + SWAP_DEADLINE_SECONDS),
		}
		.abi_encode();

		let swap_call = CallRequest {
			from: Some(owner),
			to: self.router,
			data: swap_data.clone().into(),
		};
		transactions.push((
			TransactionKind::Swap,
			self.transaction(self.router, swap_data, nonce, self.order.swap_gas_limit),
		));

		Ok(BuildPlan {
			transactions,
			swap_call,
		})
	}

	/// Builds a fresh, signed transaction set with `min_out` as the swap's output floor.
	pub async fn build(&self, min_out: U256) -> Result<SignedTransactionSet, BuildError> {
		let owner = self
			.account
			.get_address()
			.await
			.map_err(|e| BuildError::Signing(e.to_string()))?;
		let snapshot = self.snapshot(owner).await?;
		let plan = self.plan(owner, &snapshot, min_out)?;

		let mut approval = None;
		let mut swap = None;
		for (kind, tx) in plan.transactions {
			let payload = self
				.account
				.sign(&tx)
				.await
				.map_err(|e| BuildError::Signing(e.to_string()))?;
			info!(%kind, nonce = tx.nonce, tx_hash = %payload.hash, "Signed transaction");

			let signed = SignedTransaction {
				kind,
				nonce: tx.nonce,
				hash: payload.hash,
				raw: payload.raw,
			};
			match kind {
				TransactionKind::Approval => approval = Some(signed),
				TransactionKind::Swap => swap = Some(signed),
			}
		}

		let swap = swap.ok_or_else(|| BuildError::Signing("swap was not signed".to_string()))?;
		Ok(SignedTransactionSet::new(approval, swap, plan.swap_call))
	}

	fn transaction(&self, to: Address, data: Vec<u8>, nonce: u64, gas_limit: u64) -> Transaction {
		Transaction {
			to,
			data: data.into(),
			value: U256::ZERO,
			chain_id: self.chain_id,
			nonce,
			gas_limit,
			gas_price: self.order.gas_price_wei,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::consensus::TxEnvelope;
	use alloy::eips::eip2718::Decodable2718;
	use alloy::primitives::address;
	use async_trait::async_trait;
	use order_account::implementations::local::LocalWallet;
	use order_chain::ChainError;
	use order_types::{Bytes, MaxRuntime};
	use rust_decimal::Decimal;
	use secrecy::SecretString;
	use std::time::Duration;

	const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
	const DEV_ADDRESS: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
	const ROUTER: Address = address!("7a250d5630B4cF539739dF2C5dAcb4c659F2488D");
	const BLOCK_TIME: u64 = 1_700_000_000;

	struct StubChain {
		nonce: Result<u64, String>,
		allowance: U256,
	}

	#[async_trait]
	impl ChainInterface for StubChain {
		async fn nonce(&self, account: Address) -> Result<u64, ChainError> {
			assert_eq!(account, DEV_ADDRESS);
			self.nonce.clone().map_err(ChainError::Network)
		}
		async fn native_balance(&self, _: Address) -> Result<U256, ChainError> {
			unimplemented!()
		}
		async fn token_balance(&self, _: Address, _: Address) -> Result<U256, ChainError> {
			unimplemented!()
		}
		async fn allowance(
			&self,
			_token: Address,
			owner: Address,
			spender: Address,
		) -> Result<U256, ChainError> {
			assert_eq!(owner, DEV_ADDRESS);
			assert_eq!(spender, ROUTER);
			Ok(self.allowance)
		}
		async fn latest_block_timestamp(&self) -> Result<u64, ChainError> {
			Ok(BLOCK_TIME)
		}
		async fn call(&self, _: &CallRequest) -> Result<Bytes, ChainError> {
			unimplemented!()
		}
	}

	fn order() -> OrderConfig {
		OrderConfig {
			sell_token: Address::repeat_byte(1),
			buy_token: Address::repeat_byte(3),
			intermediate_token: Address::repeat_byte(2),
			sell_amount: Decimal::from(100),
			sell_token_decimals: 6,
			buy_token_decimals: 18,
			target_price: Decimal::from(2000),
			max_slippage_percent: Decimal::ZERO,
			check_interval: Duration::from_secs(60),
			max_runtime: MaxRuntime::default(),
			gas_price_wei: 30_000_000_000,
			approve_gas_limit: 80_000,
			swap_gas_limit: 500_000,
			bundle_check_delay: Duration::from_secs(10),
			max_bundle_checks: 10,
		}
	}

	fn builder(nonce: Result<u64, String>, allowance: U256) -> TransactionBuilder {
		let wallet = LocalWallet::new(&SecretString::new(DEV_KEY.to_string())).unwrap();
		TransactionBuilder::new(
			Arc::new(StubChain { nonce, allowance }),
			Arc::new(AccountService::new(Box::new(wallet))),
			order(),
			ROUTER,
			1,
		)
	}

	fn decode(tx: &SignedTransaction) -> alloy::consensus::TxLegacy {
		let envelope = TxEnvelope::decode_2718(&mut tx.raw.as_ref()).unwrap();
		envelope.as_legacy().unwrap().tx().clone()
	}

	#[tokio::test]
	async fn test_sufficient_allowance_skips_approval() {
		let builder = builder(Ok(5), U256::from(100_000_000u64));
		let set = builder.build(U256::from(42u64)).await.unwrap();

		assert_eq!(set.len(), 1);
		assert!(set.approval().is_none());
		assert_eq!(set.nonces(), vec![5]);
		assert_eq!(decode(set.swap()).nonce, 5);
	}

	#[tokio::test]
	async fn test_low_allowance_adds_approval_first() {
		let builder = builder(Ok(5), U256::from(99_999_999u64));
		let set = builder.build(U256::from(42u64)).await.unwrap();

		assert_eq!(set.len(), 2);
		assert_eq!(set.nonces(), vec![5, 6]);
		assert_eq!(set.transactions()[0].kind, TransactionKind::Approval);

		let approval = decode(&set.transactions()[0]);
		assert_eq!(approval.gas_limit, 80_000);
		assert_eq!(approval.gas_price, 30_000_000_000);
		let approve = IERC20::approveCall::abi_decode(&approval.input).unwrap();
		assert_eq!(approve.spender, ROUTER);
		assert_eq!(approve.amount, U256::from(100_000_000u64));

		let swap = decode(set.swap());
		assert_eq!(swap.gas_limit, 500_000);
		assert_eq!(swap.chain_id, Some(1));
	}

	#[tokio::test]
	async fn test_swap_terms() {
		let builder = builder(Ok(0), U256::ZERO);
		let min_out = U256::from(2000u64) * U256::from(10u64).pow(U256::from(18));
		let set = builder.build(min_out).await.unwrap();

		let swap = decode(set.swap());
		let call = IUniswapV2Router::swapExactTokensForTokensCall::abi_decode(&swap.input).unwrap();
		assert_eq!(call.amountIn, U256::from(100_000_000u64));
		assert_eq!(call.amountOutMin, min_out);
		assert_eq!(call.path, order().swap_path());
		assert_eq!(call.to, DEV_ADDRESS);
		assert_eq!(call.deadline, U256::from(BLOCK_TIME + SWAP_DEADLINE_SECONDS));

		assert_eq!(set.swap_call().from, Some(DEV_ADDRESS));
		assert_eq!(set.swap_call().to, ROUTER);
		assert_eq!(set.swap_call().data, swap.input);
	}

	#[tokio::test]
	async fn test_nonce_failure_is_state_read_error() {
		let builder = builder(Err("connection refused".to_string()), U256::ZERO);
		assert!(matches!(
			builder.build(U256::from(1u8)).await,
			Err(BuildError::StateRead(reason)) if reason.contains("connection refused")
		));
	}

	#[test]
	fn test_plan_is_pure() {
		let builder = builder(Ok(9), U256::ZERO);
		let snapshot = ChainSnapshot {
			nonce: 9,
			allowance: U256::ZERO,
			block_timestamp: BLOCK_TIME,
		};

		let first = builder.plan(DEV_ADDRESS, &snapshot, U256::from(1u8)).unwrap();
		let second = builder.plan(DEV_ADDRESS, &snapshot, U256::from(1u8)).unwrap();
		assert_eq!(first, second);
		assert_eq!(
			first
				.transactions
				.iter()
				.map(|(kind, tx)| (*kind, tx.nonce))
				.collect::<Vec<_>>(),
			vec![(TransactionKind::Approval, 9), (TransactionKind::Swap, 10)]
		);
	}
}
