//! JSON-RPC client for Titan-style builder relays.
//!
//! Bundles go to the relay's RPC endpoint via `eth_sendBundle`; statuses come
//! from a separate stats endpoint via `titan_getBundleStats`.

use crate::{RelayError, RelayInterface};
use async_trait::async_trait;
use order_types::{Bundle, BundleHash, BundleStats, BundleStatus, B256};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Relay client over HTTP JSON-RPC.
pub struct TitanRelay {
	bundle_url: String,
	status_url: String,
	client: reqwest::Client,
}

impl TitanRelay {
	pub fn new(
		bundle_url: impl Into<String>,
		status_url: impl Into<String>,
		timeout: Duration,
	) -> Result<Self, RelayError> {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| RelayError::InvalidEndpoint(e.to_string()))?;

		Ok(Self {
			bundle_url: bundle_url.into(),
			status_url: status_url.into(),
			client,
		})
	}

	/// Posts one JSON-RPC request and returns its `result` member.
	async fn rpc(&self, url: &str, method: &str, params: Value) -> Result<Value, RelayError> {
		let request = json!({
			"jsonrpc": "2.0",
			"method": method,
			"params": params,
			"id": 1
		});

		debug!(%url, %method, "Relay request");

		let response = self
			.client
			.post(url)
			.json(&request)
			.send()
			.await
			.map_err(|e| RelayError::Network(e.to_string()))?;

		let status = response.status();
		let body: Value = response.json().await.map_err(|e| {
			RelayError::InvalidResponse(format!("HTTP {} with non-JSON body: {}", status, e))
		})?;

		if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
			return Err(RelayError::Rpc(error.to_string()));
		}
		if !status.is_success() {
			return Err(RelayError::Network(format!("HTTP {}", status)));
		}

		Ok(body.get("result").cloned().unwrap_or(Value::Null))
	}
}

/// Extracts the bundle hash from an `eth_sendBundle` result.
///
/// Relays answer with a bare string, an object carrying `bundleHash`, or a
/// one-element array of either.
fn parse_bundle_hash(result: &Value) -> Result<BundleHash, RelayError> {
	if let Value::Array(items) = result {
		let first = items
			.first()
			.ok_or_else(|| RelayError::InvalidResponse("empty result array".to_string()))?;
		return parse_bundle_hash(first);
	}

	let hash = match result {
		Value::String(hash) => Some(hash.clone()),
		Value::Object(map) => map
			.get("bundleHash")
			.and_then(|h| h.as_str())
			.map(str::to_string),
		_ => None,
	};

	hash.filter(|h| !h.is_empty())
		.map(BundleHash)
		.ok_or_else(|| RelayError::InvalidResponse(format!("no bundle hash in {}", result)))
}

/// Renders an optional scalar field as text.
fn text_field(result: &Value, field: &str) -> Option<String> {
	match result.get(field)? {
		Value::Null => None,
		Value::String(s) if s.is_empty() => None,
		Value::String(s) => Some(s.clone()),
		other => Some(other.to_string()),
	}
}

/// Interprets a `titan_getBundleStats` result; `null` means no data yet.
fn parse_stats(result: &Value) -> Option<BundleStats> {
	if !result.is_object() {
		return None;
	}

	let code = result
		.get("status")
		.and_then(|s| s.as_str())
		.unwrap_or("Unknown");

	Some(BundleStats {
		status: BundleStatus::from_code(code),
		error: text_field(result, "error"),
		builder_payment: text_field(result, "builderPayment"),
	})
}

#[async_trait]
impl RelayInterface for TitanRelay {
	async fn send_bundle(&self, bundle: &Bundle) -> Result<BundleHash, RelayError> {
		let result = self
			.rpc(
				&self.bundle_url,
				"eth_sendBundle",
				json!([{ "txs": bundle.encoded_txs() }]),
			)
			.await?;

		parse_bundle_hash(&result)
	}

	async fn get_bundle_stats(&self, hash: &BundleHash) -> Result<Option<BundleStats>, RelayError> {
		let result = self
			.rpc(
				&self.status_url,
				"titan_getBundleStats",
				json!([{ "bundleHash": hash.0 }]),
			)
			.await?;

		Ok(parse_stats(&result))
	}

	async fn cancel_private_transaction(&self, tx_hash: B256) -> Result<String, RelayError> {
		let result = self
			.rpc(
				&self.bundle_url,
				"eth_cancelPrivateTransaction",
				json!([{ "txHash": tx_hash.to_string() }]),
			)
			.await?;

		Ok(result.to_string())
	}
}
