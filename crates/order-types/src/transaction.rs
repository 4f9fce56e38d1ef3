//! Transaction types for the order's execution attempts.
//!
//! An execution attempt builds unsigned [`Transaction`]s, has them signed by
//! the account, and collects the encoded payloads into a
//! [`SignedTransactionSet`] that the delivery layer frames as a bundle.

use crate::{Address, Bytes, B256, U256};

/// A read-only contract call, used for quotes and pre-submission simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
	/// Caller address (None for an anonymous call).
	pub from: Option<Address>,
	/// Contract being called.
	pub to: Address,
	/// ABI-encoded calldata.
	pub data: Bytes,
}

/// Unsigned legacy transaction ready for signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
	/// Contract being called.
	pub to: Address,
	/// Transaction data/calldata.
	pub data: Bytes,
	/// Value to transfer in native currency.
	pub value: U256,
	/// Chain ID for replay protection.
	pub chain_id: u64,
	pub nonce: u64,
	pub gas_limit: u64,
	/// Legacy gas price in wei.
	pub gas_price: u128,
}

/// Role a transaction plays inside the bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
	Approval,
	Swap,
}

impl std::fmt::Display for TransactionKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			TransactionKind::Approval => write!(f, "approve"),
			TransactionKind::Swap => write!(f, "swap"),
		}
	}
}

/// A signed, EIP-2718 encoded transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
	pub kind: TransactionKind,
	pub nonce: u64,
	/// Hash of the signed transaction.
	pub hash: B256,
	/// Raw encoded payload as it goes on the wire.
	pub raw: Bytes,
}

/// Ordered transactions of one execution attempt: an optional approval
/// followed by exactly one swap, on consecutive nonces.
///
/// Never reused across attempts; nonces and the swap deadline go stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransactionSet {
	transactions: Vec<SignedTransaction>,
	swap_call: CallRequest,
}

impl SignedTransactionSet {
	/// Assembles the set from an optional approval and the swap.
	///
	/// `swap_call` mirrors the swap's sender, target and calldata so it can be
	/// simulated against current chain state before submission.
	pub fn new(
		approval: Option<SignedTransaction>,
		swap: SignedTransaction,
		swap_call: CallRequest,
	) -> Self {
		let mut transactions = Vec::with_capacity(2);
		transactions.extend(approval);
		transactions.push(swap);
		Self {
			transactions,
			swap_call,
		}
	}

	pub fn transactions(&self) -> &[SignedTransaction] {
		&self.transactions
	}

	pub fn approval(&self) -> Option<&SignedTransaction> {
		self.transactions
			.iter()
			.find(|tx| tx.kind == TransactionKind::Approval)
	}

	pub fn swap(&self) -> &SignedTransaction {
		// `new` always pushes the swap last
		&self.transactions[self.transactions.len() - 1]
	}

	pub fn swap_call(&self) -> &CallRequest {
		&self.swap_call
	}

	pub fn nonces(&self) -> Vec<u64> {
		self.transactions.iter().map(|tx| tx.nonce).collect()
	}

	pub fn len(&self) -> usize {
		self.transactions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.transactions.is_empty()
	}

	/// Raw payloads in submission order.
	pub fn raw_transactions(&self) -> Vec<Bytes> {
		self.transactions.iter().map(|tx| tx.raw.clone()).collect()
	}
}
