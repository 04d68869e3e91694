//! Configuration command implementations

use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::ConfigCommands;
use crate::config::RunConfiguration;

/// Execute config commands
pub fn execute(cmd: ConfigCommands, config_path: Option<&Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show(config_path),
    }
}

/// Print the merged configuration. Always plain JSON so it can be piped.
fn show(config_path: Option<&Path>) -> Result<()> {
    let config = RunConfiguration::load(config_path, None)?;
    let json = serde_json::to_string_pretty(&config).context("Failed to serialize configuration")?;
    println!("{json}");
    Ok(())
}
