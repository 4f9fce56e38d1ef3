//! Configuration types for the limit order service.

use alloy::primitives::address;
use order_types::{Address, MaxRuntime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Uniswap V2 router on Ethereum mainnet.
pub const DEFAULT_ROUTER: Address = address!("7a250d5630B4cF539739dF2C5dAcb4c659F2488D");
/// Wrapped ether on Ethereum mainnet, the swap path's intermediate hop.
pub const DEFAULT_WETH: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
pub const DEFAULT_BUNDLE_URL: &str = "https://rpc.titanbuilder.xyz";
pub const DEFAULT_STATUS_URL: &str = "https://stats.titanbuilder.xyz";

/// Complete service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Chain endpoint and contract addresses
	pub network: NetworkConfig,
	/// Block-builder relay endpoints
	#[serde(default)]
	pub relay: RelayConfig,
	/// Secret provider for the signing key
	#[serde(default)]
	pub credentials: CredentialsConfig,
	/// The order itself
	pub order: OrderSection,
	/// Gas settings applied verbatim to every transaction
	pub gas: GasConfig,
	/// Bundle status tracking cadence
	#[serde(default)]
	pub tracking: TrackingConfig,
}

/// Chain endpoint and the fixed contracts the order interacts with.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	/// HTTP JSON-RPC endpoint
	pub rpc_url: String,
	#[serde(default = "default_chain_id")]
	pub chain_id: u64,
	/// Uniswap V2 compatible router used for quotes and swaps
	#[serde(default = "default_router")]
	pub router_address: Address,
	/// Intermediate token of the two-hop path
	#[serde(default = "default_weth")]
	pub weth_address: Address,
}

/// Relay endpoints for bundle submission and status tracing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
	#[serde(default = "default_bundle_url")]
	pub bundle_url: String,
	#[serde(default = "default_status_url")]
	pub status_url: String,
	#[serde(default = "default_request_timeout")]
	pub request_timeout_seconds: u64,
}

impl Default for RelayConfig {
	fn default() -> Self {
		Self {
			bundle_url: default_bundle_url(),
			status_url: default_status_url(),
			request_timeout_seconds: default_request_timeout(),
		}
	}
}

/// Which secret provider supplies the signing key, plus its own settings.
///
/// The `config` table is validated by the chosen provider's schema.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialsConfig {
	#[serde(default = "default_credential_provider")]
	pub provider: String,
	#[serde(default = "empty_table")]
	pub config: toml::Value,
}

impl Default for CredentialsConfig {
	fn default() -> Self {
		Self {
			provider: default_credential_provider(),
			config: empty_table(),
		}
	}
}

/// Order terms in human units.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderSection {
	pub sell_token: Address,
	pub buy_token: Address,
	pub sell_amount: Decimal,
	pub sell_token_decimals: u8,
	pub buy_token_decimals: u8,
	/// Minimum buy-token output for the whole sell amount
	pub target_price: Decimal,
	#[serde(default)]
	pub max_slippage_percent: Decimal,
	pub check_interval_seconds: u64,
	#[serde(default)]
	pub max_runtime: MaxRuntime,
}

/// Gas price and limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GasConfig {
	pub gas_price_gwei: Decimal,
	#[serde(default = "default_approve_gas_limit")]
	pub approve_gas_limit: u64,
	#[serde(default = "default_swap_gas_limit")]
	pub swap_gas_limit: u64,
}

/// Bundle status polling.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackingConfig {
	#[serde(default = "default_bundle_check_delay")]
	pub bundle_check_delay_seconds: u64,
	#[serde(default = "default_max_bundle_checks")]
	pub max_bundle_checks: u32,
}

impl Default for TrackingConfig {
	fn default() -> Self {
		Self {
			bundle_check_delay_seconds: default_bundle_check_delay(),
			max_bundle_checks: default_max_bundle_checks(),
		}
	}
}

fn default_chain_id() -> u64 {
	1
}

fn default_router() -> Address {
	DEFAULT_ROUTER
}

fn default_weth() -> Address {
	DEFAULT_WETH
}

fn default_bundle_url() -> String {
	DEFAULT_BUNDLE_URL.to_string()
}

fn default_status_url() -> String {
	DEFAULT_STATUS_URL.to_string()
}

fn default_request_timeout() -> u64 {
	10
}

fn default_credential_provider() -> String {
	"env".to_string()
}

fn empty_table() -> toml::Value {
	toml::Value::Table(toml::Table::new())
}

fn default_approve_gas_limit() -> u64 {
	80_000
}

fn default_swap_gas_limit() -> u64 {
	500_000
}

fn default_bundle_check_delay() -> u64 {
	10
}

fn default_max_bundle_checks() -> u32 {
	10
}
