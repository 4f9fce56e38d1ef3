use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use order_config::{Config, ConfigLoader};
use order_core::Termination;
use order_delivery::RelayInterface;
use order_types::B256;
use std::path::{Path, PathBuf};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod service;

#[derive(Parser, Debug)]
#[command(name = "limit-order")]
#[command(about = "Limit order bot executing swaps through private bundles", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Path to configuration file
	#[arg(short, long, value_name = "FILE", default_value = "config/order.toml")]
	config: PathBuf,

	#[arg(long, env = "LIMIT_ORDER_LOG_LEVEL", default_value = "info")]
	log_level: String,

	#[arg(long, value_enum, default_value_t = LogFormat::Text)]
	log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
	Text,
	Json,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
	/// Monitor the market and execute the order
	Run,
	/// Validate the configuration file without touching the network
	Validate,
	/// Ask the relay to drop a privately submitted transaction
	Cancel {
		#[arg(long, value_name = "HASH")]
		tx_hash: String,
	},
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	setup_tracing(&cli.log_level, cli.log_format)?;

	match cli.command {
		Some(Commands::Run) | None => run_order(&cli.config).await,
		Some(Commands::Validate) => validate_config(&cli.config).await,
		Some(Commands::Cancel { ref tx_hash }) => cancel_transaction(&cli.config, tx_hash).await,
	}
}

async fn load_config(path: &Path) -> Result<Config> {
	info!("Loading configuration from: {:?}", path);

	ConfigLoader::new()
		.with_file(path)
		.load()
		.await
		.context("Failed to load configuration")
}

async fn run_order(path: &Path) -> Result<()> {
	let config = load_config(path).await?;

	let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
	tokio::spawn(async move {
		setup_shutdown_signal().await;
		info!("Shutdown signal received, stopping order");
		let _ = shutdown_tx.send(());
	});

	let outcome = service::run_order(&config, shutdown_rx)
		.await
		.context("Order failed")?;

	match outcome.termination {
		Termination::Completed => info!(
			checks = outcome.checks,
			bundles = outcome.bundles,
			elapsed_secs = outcome.elapsed.as_secs(),
			"Order completed"
		),
		Termination::Expired => warn!(
			checks = outcome.checks,
			bundles = outcome.bundles,
			elapsed_secs = outcome.elapsed.as_secs(),
			"Order expired without executing"
		),
		Termination::Interrupted => info!(
			checks = outcome.checks,
			bundles = outcome.bundles,
			elapsed_secs = outcome.elapsed.as_secs(),
			"Order interrupted"
		),
	}

	Ok(())
}

async fn validate_config(path: &Path) -> Result<()> {
	let config = load_config(path).await?;
	let order = config
		.order_config()
		.context("Invalid order configuration")?;
	let summary = service::order_summary(&order).context("Invalid order configuration")?;

	info!("Configuration is valid");
	info!("Chain id: {}", config.network.chain_id);
	info!("Router: {}", config.network.router_address);
	info!("Relay: {}", config.relay.bundle_url);
	info!("Credentials: {}", config.credentials.provider);
	for (label, value) in summary {
		info!("  {}: {}", label, value);
	}

	Ok(())
}

async fn cancel_transaction(path: &Path, tx_hash: &str) -> Result<()> {
	let tx_hash: B256 = tx_hash
		.parse()
		.with_context(|| format!("Invalid transaction hash: {}", tx_hash))?;
	let config = load_config(path).await?;
	let relay = service::build_relay(&config)?;

	let result = relay
		.cancel_private_transaction(tx_hash)
		.await
		.context("Cancellation failed")?;

	info!(tx_hash = %tx_hash, result = %result, "Cancellation accepted by relay");
	Ok(())
}

fn setup_tracing(log_level: &str, format: LogFormat) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	let registry = tracing_subscriber::registry().with(env_filter);
	match format {
		LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
		LogFormat::Json => registry
			.with(tracing_subscriber::fmt::layer().json().with_current_span(true))
			.init(),
	}

	Ok(())
}

async fn setup_shutdown_signal() {
	let ctrl_c = async {
		signal::ctrl_c()
			.await
			.expect("failed to install Ctrl+C handler");
	};

	#[cfg(unix)]
	let terminate = async {
		signal::unix::signal(signal::unix::SignalKind::terminate())
			.expect("failed to install signal handler")
			.recv()
			.await;
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}
