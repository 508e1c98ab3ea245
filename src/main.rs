use anyhow::Result;
use clap::Parser;

use vitrine::{cli::Cli, config::ShowcaseConfig, window};

fn main() -> Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let config = ShowcaseConfig::from_cli(&cli);
    log::debug!("{config:?}");

    pollster::block_on(window::run(config))?;

    Ok(())
}
