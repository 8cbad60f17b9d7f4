//! Price command implementation
//!
//! Prices one contract from flags or from a JSON request file. Flags take
//! volatility, rate and dividend yield in percent; a request file is
//! already in decimals.

use clap::Args;
use pricer_core::types::{Date, DayCountConvention};
use pricer_pricing::{price_request, EngineSettings, PricingRequest, ResultSet};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::output::{render, OutputFormat};
use crate::{CliError, Result};

/// Arguments of `option-pricer price`.
#[derive(Args, Debug, Clone)]
pub struct PriceArgs {
    /// JSON request file (decimal rates); replaces the contract flags
    #[arg(long, value_name = "FILE", conflicts_with_all = ["spot", "strike", "volatility", "rate", "maturity"])]
    pub request: Option<PathBuf>,

    /// Spot price
    #[arg(long, required_unless_present = "request")]
    pub spot: Option<f64>,

    /// Strike price
    #[arg(short = 'k', long, required_unless_present = "request")]
    pub strike: Option<f64>,

    /// Volatility in percent
    #[arg(long, required_unless_present = "request")]
    pub volatility: Option<f64>,

    /// Risk-free rate in percent
    #[arg(short = 'r', long, required_unless_present = "request")]
    pub rate: Option<f64>,

    /// Dividend yield in percent
    #[arg(long)]
    pub dividend: Option<f64>,

    /// Days to maturity
    #[arg(short = 'm', long, required_unless_present = "request")]
    pub maturity: Option<i64>,

    /// Call or Put
    #[arg(long, default_value = "Call")]
    pub option_type: String,

    /// European or American
    #[arg(long, default_value = "European")]
    pub exercise: String,

    /// Analytical, AnalyticalBinary, FD, MC or Binomial
    #[arg(long, default_value = "Analytical")]
    pub method: String,

    /// Barrier level
    #[arg(long)]
    pub barrier: Option<f64>,

    /// DownIn, DownOut, UpIn or UpOut
    #[arg(long)]
    pub barrier_type: Option<String>,

    /// Barrier rebate
    #[arg(long)]
    pub rebate: Option<f64>,

    /// Valuation date (YYYY-MM-DD), today when absent
    #[arg(short, long)]
    pub date: Option<Date>,

    /// Day count: ACT/365, ACT/360 or 30/360
    #[arg(long)]
    pub day_count: Option<DayCountConvention>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Price on a blocking worker thread
    #[arg(long)]
    pub background: bool,
}

impl PriceArgs {
    /// Builds the request, reading the file or converting percent flags.
    pub fn to_request(&self) -> Result<PricingRequest> {
        if let Some(path) = &self.request {
            if !path.exists() {
                return Err(CliError::FileNotFound(path.display().to_string()));
            }
            let text = std::fs::read_to_string(path)?;
            let request: PricingRequest = serde_json::from_str(&text)?;
            debug!(file = %path.display(), "Loaded request file");
            return Ok(request);
        }

        let required = |value: Option<f64>, name: &str| {
            value.ok_or_else(|| CliError::InvalidArgument(format!("--{} is required", name)))
        };
        Ok(PricingRequest {
            spot: required(self.spot, "spot")?,
            strike: required(self.strike, "strike")?,
            volatility: percent(required(self.volatility, "volatility")?),
            risk_free_rate: percent(required(self.rate, "rate")?),
            dividend_yield: self.dividend.map(percent),
            maturity: self
                .maturity
                .ok_or_else(|| CliError::InvalidArgument("--maturity is required".to_string()))?,
            option_type: self.option_type.clone(),
            exercise_style: self.exercise.clone(),
            pricing_method: self.method.clone(),
            barrier: self.barrier,
            barrier_type: self.barrier_type.clone(),
            rebate: self.rebate,
            valuation_date: self.date,
            day_count: self.day_count,
        })
    }
}

fn percent(value: f64) -> f64 {
    value / 100.0
}

/// Prices `request`, optionally on tokio's blocking pool.
pub async fn price(
    request: PricingRequest,
    settings: EngineSettings,
    background: bool,
) -> Result<ResultSet> {
    if !background {
        return Ok(price_request(&request, &settings)?);
    }
    debug!("Offloading request to blocking worker");
    let results = tokio::task::spawn_blocking(move || price_request(&request, &settings))
        .await
        .map_err(|e| CliError::Worker(e.to_string()))??;
    Ok(results)
}

/// Run the price command
pub async fn run(args: &PriceArgs, settings: &EngineSettings) -> Result<()> {
    let request = args.to_request()?;
    info!(
        method = %request.pricing_method,
        option_type = %request.option_type,
        exercise = %request.exercise_style,
        background = args.background,
        "Starting pricing"
    );

    let results = price(request, settings.clone(), args.background).await?;
    println!("{}", render(&results, args.format)?);
    Ok(())
}
