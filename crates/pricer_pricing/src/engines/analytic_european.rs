//! Closed-form Black-Scholes-Merton engine for European vanillas.

use super::{ensure_supported, expired_value, EngineResults, PricingEngine};
use pricer_core::types::PricingError;
use pricer_models::instruments::{ContractShape, ExerciseStyle, OptionContract};
use pricer_models::models::BlackScholesProcess;

/// Analytic engine; supplies NPV and all five Greeks.
///
/// With zero volatility the price is the discounted forward intrinsic value
/// and vega is left to the bump estimator.
///
/// # Examples
/// ```
/// use pricer_core::market_data::MarketSnapshot;
/// use pricer_core::types::Date;
/// use pricer_models::instruments::{ContractSpec, ExerciseStyle, OptionType};
/// use pricer_models::models::BlackScholesProcess;
/// use pricer_pricing::engines::{AnalyticEuropeanEngine, PricingEngine};
///
/// let today = Date::from_ymd(2024, 1, 2).unwrap();
/// let contract = ContractSpec::vanilla(OptionType::Call, 100.0, ExerciseStyle::European, 365)
///     .anchor(today)
///     .unwrap();
/// let process = BlackScholesProcess::from_snapshot(&MarketSnapshot::new(today, 100.0, 0.2, 0.05));
///
/// let results = AnalyticEuropeanEngine.calculate(&contract, &process).unwrap();
/// assert!((results.npv - 10.4506).abs() < 1e-4);
/// assert!(results.vega.is_some());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEuropeanEngine;

impl PricingEngine for AnalyticEuropeanEngine {
    fn name(&self) -> &'static str {
        "Analytical"
    }

    fn supports(&self, shape: ContractShape) -> bool {
        !shape.has_barrier && shape.exercise_style == ExerciseStyle::European
    }

    fn calculate(
        &self,
        contract: &OptionContract,
        process: &BlackScholesProcess,
    ) -> Result<EngineResults, PricingError> {
        ensure_supported(self, contract)?;
        process.validate()?;

        let t = process.time_to(contract.maturity_date());
        if t <= 0.0 {
            return Ok(expired_value(contract, process.spot()));
        }

        let bs = process.black_scholes()?;
        let option_type = contract.option_type();
        let strike = contract.strike();
        let greeks = bs.greeks(option_type, strike, t);

        Ok(EngineResults {
            npv: bs.price(option_type, strike, t),
            error_estimate: None,
            delta: Some(greeks.delta),
            gamma: Some(greeks.gamma),
            vega: (process.volatility() > 0.0).then_some(greeks.vega),
            theta: Some(greeks.theta),
            rho: Some(greeks.rho),
        })
    }
}
