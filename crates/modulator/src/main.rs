//! `pcm-modulator` command-line entry point.

mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use transmitter::SimulatedPins;

use crate::cli::{execute, Cli};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = cli.load_config()?;
    tracing::info!(title = %platform::config::app_title(), "starting");

    if cli.simulate {
        tracing::info!("using simulated GPIO backend");
        return execute(cli.command, config, Some(SimulatedPins::new())).await;
    }

    #[cfg(feature = "raspberry-pi")]
    {
        match transmitter::RaspberryPiPins::new() {
            Ok(pins) => return execute(cli.command, config, Some(pins)).await,
            Err(err) => tracing::warn!(%err, "Raspberry Pi GPIO not available"),
        }
    }

    execute::<SimulatedPins>(cli.command, config, None).await
}
