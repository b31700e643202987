//! Command-line entry point.

use crate::config::AppConfig;
use crate::{logging, setup};
use clap::Parser;

/// Parses the command line, resolves settings and runs the selected mode.
pub fn main() -> anyhow::Result<()> {
    let config = AppConfig::parse();
    let settings = config.resolve()?;
    logging::init_logger(&settings)?;

    log::info!("Edgewave starting");
    log::debug!("Resolved settings: {:?}", settings);

    setup::execution::execute(&settings)?;

    log::info!("Edgewave finished.");
    Ok(())
}
