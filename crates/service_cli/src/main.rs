//! Option Pricer CLI - Command Line Pricing and Greeks
//!
//! This is the operational entry point for the option pricer.
//!
//! # Commands
//!
//! - `option-pricer price --spot 100 --strike 100 --volatility 20 --rate 5 --maturity 365`
//! - `option-pricer price --request request.json --format json`
//! - `option-pricer preset DownOut --method FD` - Price one barrier preset
//! - `option-pricer presets --method MC` - Price every barrier preset in parallel
//! - `option-pricer config` - Print the effective configuration
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate turns flags, files and
//! environment into a `PricingRequest` plus `EngineSettings` and renders the
//! resulting `ResultSet`. All numerics live in `pricer_pricing`.

use clap::{Parser, Subcommand};
use pricer_core::types::Date;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use error::{CliError, Result};

use commands::preset::BarrierPreset;
use output::OutputFormat;

/// Option pricing and Greeks
#[derive(Parser)]
#[command(name = "option-pricer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price one option from flags or a JSON request
    Price(commands::price::PriceArgs),

    /// Price one barrier preset
    Preset {
        /// Preset name
        #[arg(value_enum)]
        preset: BarrierPreset,

        /// Pricing method
        #[arg(long, default_value = "AnalyticalBinary")]
        method: String,

        /// Valuation date (YYYY-MM-DD), today when absent
        #[arg(short, long)]
        date: Option<Date>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Price every barrier preset in parallel
    Presets {
        /// Pricing method
        #[arg(long, default_value = "AnalyticalBinary")]
        method: String,

        /// Valuation date (YYYY-MM-DD), today when absent
        #[arg(short, long)]
        date: Option<Date>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Print the effective configuration
    Config,
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let app = config::load(&cli.config)?;

    init_tracing(if cli.verbose { "debug" } else { &app.log_level });
    info!(config = %cli.config.display(), log_level = %app.log_level, "Configuration loaded");

    let settings = &app.engine;
    match cli.command {
        Commands::Price(args) => commands::price::run(&args, settings).await?,
        Commands::Preset {
            preset,
            method,
            date,
            format,
        } => commands::preset::run_one(preset, &method, date, format, settings)?,
        Commands::Presets {
            method,
            date,
            format,
        } => commands::preset::run_all(&method, date, format, settings)?,
        Commands::Config => commands::config::run(&app)?,
    }
    Ok(())
}
