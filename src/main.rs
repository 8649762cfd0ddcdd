//! CipherDrive client entry point.
//!
//! Loads configuration, initializes logging and runs the requested command.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use cipherdrive_cli::Cli;
use cipherdrive_core::config::ClientConfig;
use cipherdrive_core::error::AppError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = cli.execute(config).await {
        tracing::debug!(kind = %e.kind, "Command failed: {}", e.message);
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration(base: &str) -> Result<ClientConfig, AppError> {
    let env = std::env::var("CIPHERDRIVE_ENV").unwrap_or_else(|_| "development".to_string());
    ClientConfig::load_from(base, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &ClientConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
