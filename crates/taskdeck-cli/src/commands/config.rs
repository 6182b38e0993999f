//! Config command handlers

use anyhow::{Context, Result};

use taskdeck_core::Config;

use crate::output::Output;
use crate::ConfigCommands;

/// Handle a config subcommand (defaults to Show)
pub fn handle(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => show(output),
        ConfigCommands::Path => path(output),
    }
}

fn show(output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    match output.format {
        crate::OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        _ => {
            output.message(&format!("api_url  = {}", config.api_url));
            output.message(&format!("data_dir = {}", config.data_dir.display()));
        }
    }
    Ok(())
}

fn path(output: &Output) -> Result<()> {
    output.message(&format!("{}", Config::config_file_path().display()));
    Ok(())
}
