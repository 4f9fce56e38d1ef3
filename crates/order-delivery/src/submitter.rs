use crate::{RelayInterface, SubmitError};
use order_chain::ChainInterface;
use order_types::{Bundle, BundleHash, SignedTransactionSet};
use std::sync::Arc;
use tracing::{info, warn};

/// Simulates the swap, then sends the whole set as one bundle.
///
/// A passing simulation is followed by exactly one relay write; a failing
/// one ends the attempt with nothing sent.
pub struct BundleSubmitter {
	chain: Arc<dyn ChainInterface>,
	relay: Arc<dyn RelayInterface>,
}

impl BundleSubmitter {
	pub fn new(chain: Arc<dyn ChainInterface>, relay: Arc<dyn RelayInterface>) -> Self {
		Self { chain, relay }
	}

	pub async fn submit(&self, set: &SignedTransactionSet) -> Result<BundleHash, SubmitError> {
		if let Err(e) = self.chain.call(set.swap_call()).await {
			warn!(error = %e, "Swap simulation failed, not submitting");
			return Err(SubmitError::SimulationRejected(e.to_string()));
		}
		info!("Swap simulation passed");

		let bundle = Bundle::from(set);
		let hash = self.relay.send_bundle(&bundle).await?;
		info!(bundle_hash = %hash, txs = bundle.txs().len(), "Bundle submitted");

		Ok(hash)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::RelayError;
	use async_trait::async_trait;
	use order_chain::ChainError;
	use order_types::{
		Address, BundleStats, Bytes, CallRequest, SignedTransaction, TransactionKind, B256, U256,
	};
	use std::sync::Mutex;

	struct SimulatingChain {
		revert: bool,
		calls: Mutex<Vec<CallRequest>>,
	}

	#[async_trait]
	impl ChainInterface for SimulatingChain {
		async fn nonce(&self, _: Address) -> Result<u64, ChainError> {
			unimplemented!()
		}
		async fn native_balance(&self, _: Address) -> Result<U256, ChainError> {
			unimplemented!()
		}
		async fn token_balance(&self, _: Address, _: Address) -> Result<U256, ChainError> {
			unimplemented!()
		}
		async fn allowance(&self, _: Address, _: Address, _: Address) -> Result<U256, ChainError> {
			unimplemented!()
		}
		async fn latest_block_timestamp(&self) -> Result<u64, ChainError> {
			unimplemented!()
		}
		async fn call(&self, request: &CallRequest) -> Result<Bytes, ChainError> {
			self.calls.lock().unwrap().push(request.clone());
			if self.revert {
				Err(ChainError::Reverted("TRANSFER_FROM_FAILED".to_string()))
			} else {
				Ok(Bytes::new())
			}
		}
	}

	#[derive(Default)]
	struct RecordingRelay {
		sent: Mutex<Vec<Bundle>>,
		reject: Option<String>,
	}

	#[async_trait]
	impl RelayInterface for RecordingRelay {
		async fn send_bundle(&self, bundle: &Bundle) -> Result<BundleHash, RelayError> {
			self.sent.lock().unwrap().push(bundle.clone());
			match &self.reject {
				Some(reason) => Err(RelayError::Rpc(reason.clone())),
				None => Ok(BundleHash("0xbundle".to_string())),
			}
		}
		async fn get_bundle_stats(&self, _: &BundleHash) -> Result<Option<BundleStats>, RelayError> {
			unimplemented!()
		}
		async fn cancel_private_transaction(&self, _: B256) -> Result<String, RelayError> {
			unimplemented!()
		}
	}

	fn set() -> SignedTransactionSet {
		let tx = |kind, nonce, byte| SignedTransaction {
			kind,
			nonce,
			hash: B256::repeat_byte(byte),
			raw: Bytes::from(vec![byte]),
		};
		SignedTransactionSet::new(
			Some(tx(TransactionKind::Approval, 3, 0x01)),
			tx(TransactionKind::Swap, 4, 0x02),
			CallRequest {
				from: Some(Address::repeat_byte(0xaa)),
				to: Address::repeat_byte(0xbb),
				data: Bytes::from(vec![0x38, 0xed, 0x17, 0x39]),
			},
		)
	}

	#[tokio::test]
	async fn test_simulates_swap_then_submits_once() {
		let chain = Arc::new(SimulatingChain {
			revert: false,
			calls: Mutex::new(Vec::new()),
		});
		let relay = Arc::new(RecordingRelay::default());
		let submitter = BundleSubmitter::new(chain.clone(), relay.clone());

		let hash = submitter.submit(&set()).await.unwrap();
		assert_eq!(hash, BundleHash("0xbundle".to_string()));

		assert_eq!(chain.calls.lock().unwrap().as_slice(), &[set().swap_call().clone()]);
		let sent = relay.sent.lock().unwrap();
		assert_eq!(sent.len(), 1);
		assert_eq!(sent[0].encoded_txs(), vec!["0x01", "0x02"]);
	}

	#[tokio::test]
	async fn test_failed_simulation_sends_nothing() {
		let chain = Arc::new(SimulatingChain {
			revert: true,
			calls: Mutex::new(Vec::new()),
		});
		let relay = Arc::new(RecordingRelay::default());
		let submitter = BundleSubmitter::new(chain, relay.clone());

		assert!(matches!(
			submitter.submit(&set()).await,
			Err(SubmitError::SimulationRejected(reason)) if reason.contains("TRANSFER_FROM_FAILED")
		));
		assert!(relay.sent.lock().unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_relay_rejection_is_submission_error() {
		let chain = Arc::new(SimulatingChain {
			revert: false,
			calls: Mutex::new(Vec::new()),
		});
		let relay = Arc::new(RecordingRelay {
			sent: Mutex::new(Vec::new()),
			reject: Some(r#"{"code":-32000,"message":"bundle rejected"}"#.to_string()),
		});
		let submitter = BundleSubmitter::new(chain, relay);

		let err = submitter.submit(&set()).await.unwrap_err();
		assert!(matches!(err, SubmitError::Submission(RelayError::Rpc(_))));
		assert!(err.to_string().contains("bundle rejected"));
	}
}
