//! Wiring of the order's collaborators from configuration.

use order_account::implementations::local::LocalWallet;
use order_account::{create_credential_provider, AccountService, CredentialError};
use order_chain::{AlloyChain, ChainInterface};
use order_config::Config;
use order_core::{NetworkParams, OrderError, OrderSupervisor, RunOutcome};
use order_delivery::implementations::titan::TitanRelay;
use order_delivery::RelayInterface;
use order_pricing::implementations::router::RouterQuoteClient;
use order_types::OrderConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::info;

/// Builds the relay client described by the `[relay]` section.
pub fn build_relay(config: &Config) -> Result<TitanRelay, OrderError> {
	TitanRelay::new(
		config.relay.bundle_url.clone(),
		config.relay.status_url.clone(),
		Duration::from_secs(config.relay.request_timeout_seconds),
	)
	.map_err(|e| OrderError::ConfigInvalid(format!("relay: {}", e)))
}

/// Fetches the key once and wraps it in a signing account.
///
/// Runs before any network client exists, so a missing secret fails without
/// network activity.
async fn load_account(config: &Config) -> Result<AccountService, OrderError> {
	let provider = create_credential_provider(
		&config.credentials.provider,
		&config.credentials.config,
	)
	.map_err(|e| match e {
		CredentialError::Unavailable { .. } => OrderError::CredentialUnavailable(e.to_string()),
		other => OrderError::ConfigInvalid(other.to_string()),
	})?;

	let secret = provider
		.fetch()
		.await
		.map_err(|e| OrderError::CredentialUnavailable(e.to_string()))?;

	let wallet = LocalWallet::new(&secret).map_err(|e| {
		OrderError::CredentialUnavailable(format!(
			"secret '{}' does not hold a usable private key: {}",
			provider.secret_name(),
			e
		))
	})?;

	Ok(AccountService::new(Box::new(wallet)))
}

/// Runs the configured order until it completes, expires or is interrupted.
pub async fn run_order(
	config: &Config,
	shutdown: broadcast::Receiver<()>,
) -> Result<RunOutcome, OrderError> {
	let order = config
		.order_config()
		.map_err(|e| OrderError::ConfigInvalid(e.to_string()))?;

	let account = Arc::new(load_account(config).await?);

	let chain: Arc<dyn ChainInterface> = Arc::new(
		AlloyChain::new(&config.network.rpc_url)
			.map_err(|e| OrderError::ConfigInvalid(e.to_string()))?,
	);
	let relay: Arc<dyn RelayInterface> = Arc::new(build_relay(config)?);
	let quotes = RouterQuoteClient::new(chain.clone(), config.network.router_address);

	info!(
		chain_id = config.network.chain_id,
		router = %config.network.router_address,
		relay = %config.relay.bundle_url,
		"Collaborators ready"
	);

	let mut supervisor = OrderSupervisor::new(
		order,
		account,
		chain,
		Box::new(quotes),
		relay,
		NetworkParams {
			chain_id: config.network.chain_id,
			router: config.network.router_address,
		},
	)?;

	supervisor.run(shutdown).await
}

/// Human-readable lines describing a validated order.
pub fn order_summary(order: &OrderConfig) -> Result<Vec<(&'static str, String)>, OrderError> {
	let min_acceptable = order
		.min_acceptable()
		.map_err(|e| OrderError::ConfigInvalid(e.to_string()))?;
	let amount_in = order
		.amount_in()
		.map_err(|e| OrderError::ConfigInvalid(e.to_string()))?;

	Ok(vec![
		(
			"path",
			format!(
				"{} -> {} -> {}",
				order.sell_token, order.intermediate_token, order.buy_token
			),
		),
		(
			"sell amount",
			format!("{} ({} base units)", order.sell_amount, amount_in),
		),
		("target", order.target_price.to_string()),
		("slippage", format!("{}%", order.max_slippage_percent)),
		("min acceptable (base units)", min_acceptable.to_string()),
		(
			"check interval",
			format!("{}s", order.check_interval.as_secs()),
		),
		("max runtime", order.max_runtime.describe()),
		(
			"max gas cost (wei)",
			order.max_gas_cost_wei().to_string(),
		),
	])
}
