//! `blocknav config` handlers.

use anyhow::{Context, Result};
use blocknav_core::config::{Config, paths};

use crate::cli::ConfigCommands;

pub fn run(command: &ConfigCommands) -> Result<()> {
    let path = paths::config_path();
    match command {
        ConfigCommands::Path => println!("{}", path.display()),
        ConfigCommands::Init => {
            Config::init(&path).with_context(|| format!("init config at {}", path.display()))?;
            println!("Created config at {}", path.display());
        }
        ConfigCommands::Generate => print!("{}", Config::generate()?),
    }
    Ok(())
}
