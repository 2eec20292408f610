use crate::args::Args;

use tal::Result;

use anyhow::Context;

use simple_logger::SimpleLogger;

/// Installs the logger at the level requested by the arguments. `RUST_LOG` still overrides it.
pub fn configure_app(args: &Args) -> Result {
    let level = args.level_filter()?;

    SimpleLogger::new()
        .with_level(level)
        .env()
        .init()
        .context("Couldn't install logger")?;

    return Ok(());
}
