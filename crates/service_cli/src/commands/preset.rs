//! Barrier preset commands
//!
//! Four reference barrier calls on spot 100, volatility 20%, rate 5% and a
//! one-year maturity:
//!
//! | Preset | Strike | Barrier |
//! |--------|--------|---------|
//! | DownOut | 90 | 80 |
//! | DownIn | 80 | 90 |
//! | UpOut | 110 | 120 |
//! | UpIn | 120 | 130 |

use clap::ValueEnum;
use pricer_core::types::Date;
use pricer_pricing::{price_request, EngineSettings, PricingRequest, ResultSet};
use rayon::prelude::*;
use std::fmt;
use tracing::info;

use crate::output::{render, OutputFormat};
use crate::Result;

/// Reference barrier contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum BarrierPreset {
    /// Down-and-out call, K 90, H 80
    DownOut,
    /// Down-and-in call, K 80, H 90
    DownIn,
    /// Up-and-out call, K 110, H 120
    UpOut,
    /// Up-and-in call, K 120, H 130
    UpIn,
}

impl BarrierPreset {
    /// All presets in display order.
    pub const ALL: [BarrierPreset; 4] = [
        BarrierPreset::DownOut,
        BarrierPreset::DownIn,
        BarrierPreset::UpOut,
        BarrierPreset::UpIn,
    ];

    fn name(&self) -> &'static str {
        match self {
            BarrierPreset::DownOut => "DownOut",
            BarrierPreset::DownIn => "DownIn",
            BarrierPreset::UpOut => "UpOut",
            BarrierPreset::UpIn => "UpIn",
        }
    }

    /// Strike and barrier level.
    pub fn terms(&self) -> (f64, f64) {
        match self {
            BarrierPreset::DownOut => (90.0, 80.0),
            BarrierPreset::DownIn => (80.0, 90.0),
            BarrierPreset::UpOut => (110.0, 120.0),
            BarrierPreset::UpIn => (120.0, 130.0),
        }
    }

    /// Request pricing this preset with `method`.
    pub fn request(&self, method: &str, valuation_date: Option<Date>) -> PricingRequest {
        let (strike, barrier) = self.terms();
        PricingRequest {
            spot: 100.0,
            strike,
            volatility: 0.2,
            risk_free_rate: 0.05,
            dividend_yield: None,
            maturity: 365,
            option_type: "Call".to_string(),
            exercise_style: "European".to_string(),
            pricing_method: method.to_string(),
            barrier: Some(barrier),
            barrier_type: Some(self.name().to_string()),
            rebate: None,
            valuation_date,
            day_count: None,
        }
    }
}

impl fmt::Display for BarrierPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Prices every preset in parallel, each on its own snapshot.
pub fn price_all(
    method: &str,
    valuation_date: Option<Date>,
    settings: &EngineSettings,
) -> Vec<(BarrierPreset, Result<ResultSet>)> {
    BarrierPreset::ALL
        .par_iter()
        .map(|preset| {
            let request = preset.request(method, valuation_date);
            let results = price_request(&request, settings).map_err(Into::into);
            (*preset, results)
        })
        .collect()
}

/// Run the preset command
pub fn run_one(
    preset: BarrierPreset,
    method: &str,
    valuation_date: Option<Date>,
    format: OutputFormat,
    settings: &EngineSettings,
) -> Result<()> {
    info!(%preset, method, "Pricing barrier preset");
    let results = price_request(&preset.request(method, valuation_date), settings)?;
    println!("{}", render(&results, format)?);
    Ok(())
}

/// Run the presets command
pub fn run_all(
    method: &str,
    valuation_date: Option<Date>,
    format: OutputFormat,
    settings: &EngineSettings,
) -> Result<()> {
    info!(method, "Pricing all barrier presets");
    for (preset, results) in price_all(method, valuation_date, settings) {
        println!("{preset}");
        println!("{}", render(&results?, format)?);
    }
    Ok(())
}
