//! Config command implementation
//!
//! Prints the effective configuration after defaults, file and environment
//! have been merged.

use crate::config::AppConfig;
use crate::Result;

/// Effective configuration as TOML.
pub fn render(config: &AppConfig) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}

/// Run the config command
pub fn run(config: &AppConfig) -> Result<()> {
    println!("{}", render(config)?);
    Ok(())
}
