//! # lifbox CLI
//!
//! Command-line driver for boxed leaky integrate-and-fire neurons.

use clap::Parser;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lifbox_cli::{error::CliResult, LifboxCli};

fn main() -> CliResult<()> {
    // Parse CLI arguments
    let cli = LifboxCli::parse();

    // Initialize logging with environment variable support
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Execute the command
    if let Err(err) = cli.execute() {
        error!("Command failed: {}", err);
        std::process::exit(1);
    }

    Ok(())
}
