//! Bundle types exchanged with the block-builder relay.

use crate::{Bytes, SignedTransactionSet};
use serde::{Deserialize, Serialize};

/// A set of raw transactions submitted for atomic, all-or-nothing inclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
	txs: Vec<Bytes>,
}

impl Bundle {
	/// Frames already-encoded payloads, in submission order.
	pub fn from_raw(txs: Vec<Bytes>) -> Self {
		Self { txs }
	}

	pub fn txs(&self) -> &[Bytes] {
		&self.txs
	}

	/// Hex-encoded payloads with `0x` prefix, as relays expect them.
	pub fn encoded_txs(&self) -> Vec<String> {
		self.txs.iter().map(|tx| tx.to_string()).collect()
	}
}

impl From<&SignedTransactionSet> for Bundle {
	fn from(set: &SignedTransactionSet) -> Self {
		Self {
			txs: set.raw_transactions(),
		}
	}
}

/// Relay-assigned identifier of a submitted bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BundleHash(pub String);

impl std::fmt::Display for BundleHash {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Inclusion status reported by the relay for a bundle.
///
/// `Pending` means the relay returned no data yet. `Submitted` is the only
/// successful terminal status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleStatus {
	Pending,
	Received,
	SimulationPass,
	IncludedInBlock,
	Submitted,
	Invalid,
	SimulationFail,
	ExcludedFromBlock,
	Unknown(String),
}

impl BundleStatus {
	/// Parses a relay status code. Unrecognized codes map to `Unknown`.
	pub fn from_code(code: &str) -> Self {
		match code {
			"Received" => BundleStatus::Received,
			"SimulationPass" => BundleStatus::SimulationPass,
			"IncludedInBlock" => BundleStatus::IncludedInBlock,
			"Submitted" => BundleStatus::Submitted,
			"Invalid" => BundleStatus::Invalid,
			"SimulationFail" => BundleStatus::SimulationFail,
			"ExcludedFromBlock" => BundleStatus::ExcludedFromBlock,
			other => BundleStatus::Unknown(other.to_string()),
		}
	}

	/// Terminal statuses end tracking; nothing transitions out of them.
	pub fn is_terminal(&self) -> bool {
		matches!(
			self,
			BundleStatus::Submitted
				| BundleStatus::Invalid
				| BundleStatus::SimulationFail
				| BundleStatus::ExcludedFromBlock
		)
	}

	pub fn is_success(&self) -> bool {
		matches!(self, BundleStatus::Submitted)
	}

	/// Operator-facing meaning of the status.
	pub fn explanation(&self) -> String {
		match self {
			BundleStatus::Pending => "No status data yet".to_string(),
			BundleStatus::Received => {
				"Received but arrived too late to be added to the pool".to_string()
			}
			BundleStatus::SimulationPass => {
				"Passed simulation but sent too late to be included".to_string()
			}
			BundleStatus::IncludedInBlock => {
				"Considered, but another algorithm produced a more valuable block".to_string()
			}
			BundleStatus::Submitted => "Included in a block and executed".to_string(),
			BundleStatus::Invalid => {
				"Invalid bundle (check encoding, block number, nonces, chain ID)".to_string()
			}
			BundleStatus::SimulationFail => {
				"Simulation failed (transaction reverted or insufficient builder payment)"
					.to_string()
			}
			BundleStatus::ExcludedFromBlock => {
				"Valid but not selected (likely insufficient gas price or sent too late)"
					.to_string()
			}
			BundleStatus::Unknown(code) => format!("Unknown status: {}", code),
		}
	}
}

impl std::fmt::Display for BundleStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			BundleStatus::Unknown(code) => write!(f, "Unknown({})", code),
			other => write!(f, "{:?}", other),
		}
	}
}

/// One status observation returned by the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleStats {
	pub status: BundleStatus,
	/// Error string attached by the relay, if any.
	pub error: Option<String>,
	/// Payment to the builder in wei, as reported.
	pub builder_payment: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_classification() {
		for code in ["Received", "SimulationPass", "IncludedInBlock"] {
			let status = BundleStatus::from_code(code);
			assert!(!status.is_terminal(), "{} should not be terminal", code);
			assert!(!status.is_success());
		}

		for code in ["Invalid", "SimulationFail", "ExcludedFromBlock"] {
			let status = BundleStatus::from_code(code);
			assert!(status.is_terminal(), "{} should be terminal", code);
			assert!(!status.is_success());
		}

		let submitted = BundleStatus::from_code("Submitted");
		assert!(submitted.is_terminal());
		assert!(submitted.is_success());
	}

	#[test]
	fn test_unknown_status_keeps_code() {
		let status = BundleStatus::from_code("Bogus");
		assert_eq!(status, BundleStatus::Unknown("Bogus".to_string()));
		assert!(!status.is_terminal());
		assert_eq!(status.to_string(), "Unknown(Bogus)");
	}

	#[test]
	fn test_bundle_from_set_keeps_order() {
		use crate::{Address, CallRequest, SignedTransaction, TransactionKind, B256};

		let approval = SignedTransaction {
			kind: TransactionKind::Approval,
			nonce: 7,
			hash: B256::repeat_byte(1),
			raw: Bytes::from(vec![0xaa]),
		};
		let swap = SignedTransaction {
			kind: TransactionKind::Swap,
			nonce: 8,
			hash: B256::repeat_byte(2),
			raw: Bytes::from(vec![0xbb, 0xcc]),
		};
		let call = CallRequest {
			from: None,
			to: Address::ZERO,
			data: Bytes::new(),
		};
		let set = SignedTransactionSet::new(Some(approval), swap, call);

		let bundle = Bundle::from(&set);
		assert_eq!(bundle.encoded_txs(), vec!["0xaa", "0xbbcc"]);
		assert_eq!(set.nonces(), vec![7, 8]);
	}
}
