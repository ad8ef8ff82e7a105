use std::path::PathBuf;

use clap::Parser;
use mvu_state::config::Config;

/// Terminal counter driven by the model/update/view runtime.
#[derive(Debug, Parser)]
#[command(name = "mvu-counter", version)]
struct Cli {
    /// Path to a config file (default: the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen to mouse clicks while the count is below this value
    #[arg(long)]
    click_limit: Option<i64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(path) = mvu_state::logging::init_tracing() {
        tracing::info!(path = %path, "logging initialised");
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(limit) = cli.click_limit {
        config.counter.click_limit = limit;
    }

    mvu_state::ui::run(config)
}
