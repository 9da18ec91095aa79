use clap::{Args, Parser};
use std::path::PathBuf;
use tracing::info;

use reqsim::{logging::setup_logging, ReqSim, ServiceConfig};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct CommonArgs {
    /// Path to a specific config file, bypassing the layered config/ lookup
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dump default config and exit
    #[arg(long = "dump-default-config")]
    dump_default: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line args
    let cli = Cli::parse();

    if cli.common.dump_default {
        let config = ServiceConfig::default();
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    // Load config
    let config = match cli.common.config {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::new()?,
    };

    setup_logging(&config)?;

    info!("Starting reqsim");

    let sim = ReqSim::new(config)?;
    let shutdown = sim.shutdown_handle();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, shutting down");
            let _ = shutdown.send(());
        }
    });

    sim.run().await?;

    Ok(())
}
