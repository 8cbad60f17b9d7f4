//! CLI error types.

use pricer_pricing::ValuationError;
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The pricing request was rejected
    #[error(transparent)]
    Valuation(#[from] ValuationError),

    /// Configuration sources could not be merged
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Engine settings failed validation
    #[error("Invalid engine settings: {0}")]
    Settings(#[from] pricer_pricing::ConfigError),

    /// Request file does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Argument combination not accepted
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Background worker did not complete
    #[error("Background worker failed: {0}")]
    Worker(String),

    /// Reading a request file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON request or failed JSON output
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Effective configuration could not be rendered
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
