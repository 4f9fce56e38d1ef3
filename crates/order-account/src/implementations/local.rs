//! Local wallet backed by an in-memory private key.

use crate::{AccountError, AccountInterface, SignedPayload};
use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSigner;
use alloy::primitives::{Signature, TxKind};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use order_types::{Address, Transaction};
use secrecy::{ExposeSecret, SecretString};

/// Signs legacy transactions with a key fetched at startup.
pub struct LocalWallet {
	signer: PrivateKeySigner,
}

impl LocalWallet {
	/// Parses a hex private key, with or without a `0x` prefix.
	pub fn new(key: &SecretString) -> Result<Self, AccountError> {
		let signer = key
			.expose_secret()
			.trim()
			.parse::<PrivateKeySigner>()
			.map_err(|e| AccountError::InvalidKey(e.to_string()))?;

		Ok(Self { signer })
	}
}

#[async_trait]
impl AccountInterface for LocalWallet {
	async fn address(&self) -> Result<Address, AccountError> {
		Ok(self.signer.address())
	}

	async fn sign_transaction(&self, tx: &Transaction) -> Result<SignedPayload, AccountError> {
		let mut legacy = TxLegacy {
			chain_id: Some(tx.chain_id),
			nonce: tx.nonce,
			gas_price: tx.gas_price,
			gas_limit: tx.gas_limit,
			to: TxKind::Call(tx.to),
			value: tx.value,
			input: tx.data.clone(),
		};

		let signature: Signature = TxSigner::<Signature>::sign_transaction(&self.signer, &mut legacy)
			.await
			.map_err(|e| AccountError::SigningFailed(e.to_string()))?;

		let signed = legacy.into_signed(signature);
		let hash = *signed.hash();
		let envelope = TxEnvelope::from(signed);

		Ok(SignedPayload {
			hash,
			raw: envelope.encoded_2718().into(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::eips::eip2718::Decodable2718;
	use alloy::primitives::{address, Bytes, U256};

	// Well-known development key (first anvil/hardhat account).
	const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	fn wallet() -> LocalWallet {
		LocalWallet::new(&SecretString::new(DEV_KEY.to_string())).unwrap()
	}

	#[tokio::test]
	async fn test_address_from_key() {
		assert_eq!(
			wallet().address().await.unwrap(),
			address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
		);
	}

	#[test]
	fn test_key_without_prefix() {
		let key = SecretString::new(DEV_KEY.trim_start_matches("0x").to_string());
		assert!(LocalWallet::new(&key).is_ok());
	}

	#[test]
	fn test_invalid_key() {
		let key = SecretString::new("not-a-key".to_string());
		assert!(matches!(
			LocalWallet::new(&key),
			Err(AccountError::InvalidKey(_))
		));
	}

	#[tokio::test]
	async fn test_signed_payload_decodes() {
		let tx = Transaction {
			to: address!("7a250d5630B4cF539739dF2C5dAcb4c659F2488D"),
			data: Bytes::from(vec![0x12, 0x34]),
			value: U256::ZERO,
			chain_id: 1,
			nonce: 7,
			gas_limit: 500_000,
			gas_price: 30_000_000_000,
		};

		let payload = wallet().sign_transaction(&tx).await.unwrap();
		let envelope = TxEnvelope::decode_2718(&mut payload.raw.as_ref()).unwrap();
		assert_eq!(*envelope.tx_hash(), payload.hash);

		let legacy = envelope.as_legacy().unwrap().tx();
		assert_eq!(legacy.nonce, 7);
		assert_eq!(legacy.gas_limit, 500_000);
		assert_eq!(legacy.gas_price, 30_000_000_000);
		assert_eq!(legacy.chain_id, Some(1));
		assert_eq!(legacy.input, tx.data);
	}
}
