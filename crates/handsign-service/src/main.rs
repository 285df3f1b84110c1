use std::path::PathBuf;

use clap::Parser;
use handsign_core::Error;
use handsign_service::{FrameService, ServiceConfig};
use tokio::io::{stdin, stdout, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "handsign")]
#[command(about = "Classify hand-landmark frames read as JSON lines from stdin")]
struct Args {
    /// Configuration file (TOML, YAML or JSON); environment only when omitted
    #[arg(long, env = "HANDSIGN_CONFIG")]
    config: Option<PathBuf>,

    /// Tracing filter, overrides the configured log level
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => ServiceConfig::from_file(path),
        None => ServiceConfig::from_env(),
    };
    let mut config = loaded.map_err(|e| Error::Config(e.to_string()))?;
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    // stdout carries the protocol, so logs go to stderr.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let service = FrameService::from_config(&config)?;
    info!(
        methods = ?service.manager().registry().available_methods(),
        max_sessions = service.manager().max_sessions(),
        "handsign ready"
    );

    let stats = service.run(BufReader::new(stdin()), stdout()).await?;
    info!(?stats, "input closed");

    Ok(())
}
