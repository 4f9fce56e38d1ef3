//! Configuration loading from files and environment.

use crate::{types::Config, ConfigError};
use order_types::{amount, OrderConfig};
use rust_decimal::Decimal;
use std::env;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Largest token precision accepted; keeps every scaled amount inside 256 bits.
const MAX_DECIMALS: u8 = 36;
/// Prefix of the variables overriding endpoints, e.g. `LIMIT_ORDER_RPC_URL`.
const ENV_PREFIX: &str = "LIMIT_ORDER_";

/// Serialization format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
	Toml,
	Json,
	Yaml,
}

impl ConfigFormat {
	fn from_path(path: &Path) -> Result<Self, ConfigError> {
		match path.extension().and_then(|s| s.to_str()) {
			Some("toml") | None => Ok(ConfigFormat::Toml),
			Some("json") => Ok(ConfigFormat::Json),
			Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
			Some(other) => Err(ConfigError::ParseError(format!(
				"Unsupported config format: {}",
				other
			))),
		}
	}
}

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
	file_path: Option<String>,
}

impl Default for ConfigLoader {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_string_lossy().to_string());
		self
	}

	/// Reads, substitutes, parses and validates the configured file.
	pub async fn load(&self) -> Result<Config, ConfigError> {
		let file_path = self.file_path.as_ref().ok_or_else(|| {
			ConfigError::FileNotFound("No configuration file specified".to_string())
		})?;

		let path = Path::new(file_path);
		if !path.exists() {
			return Err(ConfigError::FileNotFound(file_path.clone()));
		}

		let content = tokio::fs::read_to_string(path).await?;
		let format = ConfigFormat::from_path(path)?;

		let mut config = self.parse(&content, format)?;
		self.apply_env_overrides(&mut config);
		config.validate()?;

		Ok(config)
	}

	/// Parses a document after `${VAR}` substitution, without validation.
	pub fn parse(&self, content: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
		let content = substitute_env_vars(content)?;

		match format {
			ConfigFormat::Toml => {
				toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
			}
			ConfigFormat::Json => {
				serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
			}
			ConfigFormat::Yaml => {
				serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
			}
		}
	}

	fn apply_env_overrides(&self, config: &mut Config) {
		if let Ok(rpc_url) = env::var(format!("{}RPC_URL", ENV_PREFIX)) {
			debug!("Overriding RPC URL from environment");
			config.network.rpc_url = rpc_url;
		}

		if let Ok(bundle_url) = env::var(format!("{}BUNDLE_URL", ENV_PREFIX)) {
			debug!("Overriding relay bundle URL from environment");
			config.relay.bundle_url = bundle_url;
		}

		if let Ok(status_url) = env::var(format!("{}STATUS_URL", ENV_PREFIX)) {
			debug!("Overriding relay status URL from environment");
			config.relay.status_url = status_url;
		}
	}
}

/// Replaces `${VAR_NAME}` patterns with the variable's value.
fn substitute_env_vars(content: &str) -> Result<String, ConfigError> {
	let re = regex::Regex::new(r"\$\{([^}]+)\}")
		.map_err(|e| ConfigError::ParseError(e.to_string()))?;

	let mut result = content.to_string();
	for cap in re.captures_iter(content) {
		let full_match = &cap[0];
		let var_name = &cap[1];

		let env_value =
			env::var(var_name).map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

		result = result.replace(full_match, &env_value);
	}

	Ok(result)
}

fn invalid(message: impl Into<String>) -> ConfigError {
	ConfigError::ValidationError(message.into())
}

fn check_url(field: &str, url: &str) -> Result<(), ConfigError> {
	if url.starts_with("http://") || url.starts_with("https://") {
		Ok(())
	} else {
		Err(invalid(format!(
			"{} must start with http:// or https://, got '{}'",
			field, url
		)))
	}
}

fn check_decimals(field: &str, decimals: u8) -> Result<(), ConfigError> {
	if decimals == 0 || decimals > MAX_DECIMALS {
		return Err(invalid(format!(
			"{} must be between 1 and {}, got {}",
			field, MAX_DECIMALS, decimals
		)));
	}
	Ok(())
}

impl Config {
	/// Checks every range the order relies on.
	pub fn validate(&self) -> Result<(), ConfigError> {
		check_url("network.rpc_url", &self.network.rpc_url)?;
		check_url("relay.bundle_url", &self.relay.bundle_url)?;
		check_url("relay.status_url", &self.relay.status_url)?;

		if self.network.chain_id == 0 {
			return Err(invalid("network.chain_id must be positive"));
		}
		if self.relay.request_timeout_seconds == 0 {
			return Err(invalid("relay.request_timeout_seconds must be positive"));
		}

		let order = &self.order;
		if order.sell_token == order.buy_token {
			return Err(invalid("order.sell_token and order.buy_token must differ"));
		}
		check_decimals("order.sell_token_decimals", order.sell_token_decimals)?;
		check_decimals("order.buy_token_decimals", order.buy_token_decimals)?;

		if order.sell_amount <= Decimal::ZERO {
			return Err(invalid(format!(
				"order.sell_amount must be positive, got {}",
				order.sell_amount
			)));
		}
		if order.target_price <= Decimal::ZERO {
			return Err(invalid(format!(
				"order.target_price must be positive, got {}",
				order.target_price
			)));
		}
		if order.max_slippage_percent < Decimal::ZERO
			|| order.max_slippage_percent > Decimal::ONE_HUNDRED
		{
			return Err(invalid(format!(
				"order.max_slippage_percent must be within [0, 100], got {}",
				order.max_slippage_percent
			)));
		}
		if order.check_interval_seconds == 0 {
			return Err(invalid("order.check_interval_seconds must be positive"));
		}

		let amount_in = amount::to_base_units(order.sell_amount, order.sell_token_decimals)
			.map_err(|e| invalid(format!("order.sell_amount: {}", e)))?;
		if amount_in.is_zero() {
			return Err(invalid(format!(
				"order.sell_amount {} is smaller than one base unit",
				order.sell_amount
			)));
		}
		amount::min_output_units(
			order.target_price,
			order.max_slippage_percent,
			order.buy_token_decimals,
		)
		.map_err(|e| invalid(format!("order.target_price: {}", e)))?;

		if self.gas.gas_price_gwei <= Decimal::ZERO {
			return Err(invalid("gas.gas_price_gwei must be positive"));
		}
		if self.gas.approve_gas_limit == 0 || self.gas.swap_gas_limit == 0 {
			return Err(invalid("gas limits must be positive"));
		}
		self.gas_price_wei()?;

		if self.tracking.bundle_check_delay_seconds == 0 {
			return Err(invalid(
				"tracking.bundle_check_delay_seconds must be positive",
			));
		}
		if self.tracking.max_bundle_checks == 0 {
			return Err(invalid("tracking.max_bundle_checks must be positive"));
		}

		Ok(())
	}

	fn gas_price_wei(&self) -> Result<u128, ConfigError> {
		let wei = amount::to_base_units(self.gas.gas_price_gwei, 9)
			.map_err(|e| invalid(format!("gas.gas_price_gwei: {}", e)))?;
		u128::try_from(wei).map_err(|_| invalid("gas.gas_price_gwei is too large"))
	}

	/// Builds the immutable order terms handed to the supervisor.
	pub fn order_config(&self) -> Result<OrderConfig, ConfigError> {
		self.validate()?;

		let order = &self.order;
		Ok(OrderConfig {
			sell_token: order.sell_token,
			buy_token: order.buy_token,
			intermediate_token: self.network.weth_address,
			sell_amount: order.sell_amount,
			sell_token_decimals: order.sell_token_decimals,
			buy_token_decimals: order.buy_token_decimals,
			target_price: order.target_price,
			max_slippage_percent: order.max_slippage_percent,
			check_interval: Duration::from_secs(order.check_interval_seconds),
			max_runtime: order.max_runtime,
			gas_price_wei: self.gas_price_wei()?,
			approve_gas_limit: self.gas.approve_gas_limit,
			swap_gas_limit: self.gas.swap_gas_limit,
			bundle_check_delay: Duration::from_secs(self.tracking.bundle_check_delay_seconds),
			max_bundle_checks: self.tracking.max_bundle_checks,
		})
	}
}
