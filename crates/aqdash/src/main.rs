//! Main entry point for the aqdash dashboard generator.

use anyhow::{Context, Result};
use aqdash::Dashboard;
use aqdash_common::init_logging;
use aqdash_config::{Config, ConfigLoader};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

/// Generate a static PM2.5 dashboard from hourly air-quality readings
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// YAML configuration file (defaults to AQDASH_CONFIG_PATH or ./aqdash.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input CSV with the hourly readings
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Directory receiving index.html and the chart images
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

impl Args {
    /// Command line values take precedence over the file and environment.
    fn apply(&self, config: &mut Config) {
        if let Some(data) = &self.data {
            config.data.path = data.display().to_string();
        }
        if let Some(output) = &self.output {
            config.output.directory = output.display().to_string();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    init_logging(config.logging.to_subscriber_config()).map_err(|e| anyhow::anyhow!(e))?;
    info!(data = %config.data.path, output = %config.output.directory, "Starting aqdash");

    let output = Dashboard::new(config)
        .build()
        .context("Failed to build the dashboard")?;

    let failed = output.failed_sections();
    if failed.is_empty() {
        info!(page = %output.index.display(), "Dashboard ready");
    } else {
        warn!(
            page = %output.index.display(),
            failed = failed.len(),
            "Dashboard ready with failed sections"
        );
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    ConfigLoader::load_with(args.config.as_deref(), |config| args.apply(config))
        .context("Failed to load configuration")
}
