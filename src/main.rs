use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

use wetland_area::config::Config;
use wetland_area::pipeline::{BasinOutcome, BatchRunner};

#[derive(Debug, Parser)]
#[command(name = "wetland-area")]
#[command(about = "Wetland area per class inside drainage basin boundaries")]
struct Cli {
    /// JSON configuration file
    #[arg(long, default_value = "./data/config/basins.json")]
    config: PathBuf,

    /// Only process these basins (repeatable); defaults to every configured basin
    #[arg(long = "basin")]
    basins: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = Config::from_file(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;
    if !cli.basins.is_empty() {
        config.select_basins(&cli.basins)?;
    }

    info!(
        "Starting wetland area estimation for {} basins (classes: {})",
        config.basins().len(),
        config.classes()
    );

    let runner = BatchRunner::from_config(&config);
    let report = runner.run();

    for (basin, outcome) in &report.basins {
        match outcome {
            BasinOutcome::Exported { rows, path } => {
                info!("  {basin}: {} rows -> {}", rows.len(), path.display())
            }
            BasinOutcome::Empty => info!("  {basin}: no data"),
            BasinOutcome::Aborted(e) => warn!("  {basin}: failed ({e})"),
        }
    }
    info!(
        "Done: {} exported, {} empty, {} failed",
        report.exported(),
        report.empty(),
        report.aborted()
    );

    Ok(())
}
