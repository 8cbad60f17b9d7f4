//! Valuation orchestration.
//!
//! [`value_contract`] prices a contract once with the selected method, maps
//! the engine output onto a [`ResultSet`] and hands the gaps to the bump
//! estimator. Engine failures never abort the call:
//!
//! - a quantity the engine did not produce becomes `Unavailable`
//! - a failed calculation makes every quantity `Unavailable`
//!
//! Only contract, market and shape validation return an error.

use crate::engines::{EngineResults, PricingEngine};
use crate::error::ValuationError;
use crate::greeks::{BumpEstimator, Quantity, QuantityValue, ResultSet};
use crate::method::PricingMethod;
use crate::settings::EngineSettings;
use pricer_core::market_data::MarketSnapshot;
use pricer_core::types::PricingError;
use pricer_models::instruments::{ContractSpec, OptionContract};
use pricer_models::models::BlackScholesProcess;
use tracing::{debug, warn};

/// Values `spec` against `snapshot` with `method`, then fills the missing
/// Greeks by bump-and-reprice.
///
/// Quotes in `snapshot` are bit-identical before and after the call.
///
/// # Errors
/// - `ValuationError::InvalidInput` for invalid market data or contract terms
/// - `ValuationError::UnsupportedContractShape` when `method` cannot price `spec`
///
/// # Examples
/// ```
/// use pricer_core::market_data::MarketSnapshot;
/// use pricer_core::types::Date;
/// use pricer_models::instruments::{ContractSpec, ExerciseStyle, OptionType};
/// use pricer_pricing::greeks::{Quantity, QuantityValue};
/// use pricer_pricing::{value_contract, EngineSettings, PricingMethod};
///
/// let snapshot = MarketSnapshot::new(Date::from_ymd(2024, 1, 2).unwrap(), 100.0, 0.2, 0.05);
/// let spec = ContractSpec::vanilla(OptionType::Call, 100.0, ExerciseStyle::European, 365);
///
/// let results = value_contract(&spec, &snapshot, &PricingMethod::Analytical, &EngineSettings::default())
///     .unwrap();
/// assert!((results.npv() - 10.4506).abs() < 1e-4);
/// assert!(matches!(results.get(Quantity::Vega), QuantityValue::Engine(_)));
/// ```
pub fn value_contract(
    spec: &ContractSpec,
    snapshot: &MarketSnapshot,
    method: &PricingMethod,
    settings: &EngineSettings,
) -> Result<ResultSet, ValuationError> {
    snapshot.validate()?;
    let contract = spec.anchor(snapshot.valuation_date())?;

    let shape = contract.shape();
    if !method.supports(shape) {
        return Err(ValuationError::UnsupportedContractShape {
            method: method.name(),
            shape,
        });
    }

    let process = BlackScholesProcess::from_snapshot(snapshot);
    let mut results = price_once(method, &contract, &process);
    if !results.is_valued() {
        return Ok(results);
    }

    BumpEstimator::new(method, &contract, &process, settings.bump).fill(&mut results);
    Ok(results)
}

/// Single engine call mapped onto a result set.
fn price_once<E: PricingEngine + ?Sized>(
    engine: &E,
    contract: &OptionContract,
    process: &BlackScholesProcess,
) -> ResultSet {
    match engine.calculate(contract, process) {
        Ok(output) => collect(engine.name(), &output),
        Err(e) => {
            warn!(method = engine.name(), error = %e, "Valuation failed");
            ResultSet::unavailable()
        }
    }
}

fn collect(method: &'static str, output: &EngineResults) -> ResultSet {
    if let Some(error) = output.error_estimate {
        debug!(method, npv = output.npv, error, "Engine error estimate");
    }

    let mut results = ResultSet::unavailable();
    for quantity in Quantity::ALL {
        match output.get(quantity) {
            Ok(value) => results.set(quantity, QuantityValue::Engine(value)),
            Err(PricingError::QuantityUnavailable(name)) => {
                debug!(method, quantity = name, "Quantity not provided by engine");
            }
            Err(e) => {
                debug!(method, quantity = quantity.name(), error = %e, "Quantity unavailable");
            }
        }
    }
    results
}
