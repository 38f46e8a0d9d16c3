//! Entry point for the `registry` command-line bridge.
//!
//! Loads the TOML configuration, connects to the registry contract and runs
//! a single operation, printing its result as JSON on stdout.
//!
//! ```bash
//! registry --config config/registry.toml create-service \
//!     --description "Walk the dog daily" --wallet 0x...
//! registry --config config/registry.toml list-services
//! ```

use clap::Parser;
use registry_config::Config;
use registry_core::RegistryService;
use registry_service::{execute, Command, CommandError};
use std::path::PathBuf;

/// Command-line arguments for the registry bridge.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, env = "REGISTRY_CONFIG", default_value = "config/registry.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	#[command(subcommand)]
	command: Command,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(args.log_level.clone()));

	// Logs go to stderr so stdout carries only the JSON result.
	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.with_writer(std::io::stderr)
		.init();

	tracing::info!(command = ?args.command, "Started registry bridge");

	let config = match Config::from_file(&args.config).await {
		Ok(config) => config,
		Err(e) => {
			tracing::error!(path = %args.config.display(), error = %e, "Failed to load configuration");
			println!(
				"{}",
				serde_json::json!({ "error": "ConfigurationError", "message": e.to_string() })
			);
			std::process::exit(1);
		},
	};
	tracing::info!("Loaded configuration [{}]", config.registry.id);

	let result = match RegistryService::from_config(&config).await {
		Ok(service) => execute(&service, args.command).await,
		Err(e) => Err(CommandError::from(e)),
	};

	match result {
		Ok(output) => {
			println!("{}", serde_json::to_string_pretty(&output)?);
			Ok(())
		},
		Err(e) => {
			tracing::error!(kind = e.kind(), error = %e, "Command failed");
			println!("{}", serde_json::to_string_pretty(&e.to_json())?);
			std::process::exit(1);
		},
	}
}
