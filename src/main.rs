use std::path::PathBuf;

use clap::Parser;

use acter::config::load_config;
use acter::lifecycle::{boot, shutdown_signal, Collaborators};
use acter::observability::init_logging;

#[derive(Parser)]
#[command(name = "acter")]
#[command(about = "Boot an application server from a configuration file", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config/default.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    init_logging(&config.logging)?;

    tracing::debug!(path = %cli.config.display(), "Configuration loaded");

    let booted = match boot(config, Collaborators::default()).await {
        Ok(booted) => booted,
        Err(err) => {
            tracing::error!(error = %err, "Boot failed");
            if let Some(code) = err.exit_code() {
                std::process::exit(code);
            }
            return Err(err.into());
        }
    };

    tracing::info!(services = ?booted.services.names(), "Services registered");

    booted.server.run_until(shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
