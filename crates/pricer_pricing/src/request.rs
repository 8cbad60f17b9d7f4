//! Request dispatch.
//!
//! A [`PricingRequest`] is the flat field set a caller submits. Every
//! enumerated field is parsed before any numerics run, so a misspelt option
//! type fails the same way whichever method was asked for.
//!
//! ```text
//! PricingRequest ─▶ route ─▶ parse enums ─▶ check terms ─▶ select_method ─▶ value_contract
//! ```

use crate::error::ValuationError;
use crate::greeks::ResultSet;
use crate::method::{select_method, MethodKind};
use crate::settings::EngineSettings;
use crate::valuation::value_contract;
use pricer_core::market_data::MarketSnapshot;
use pricer_core::types::{Date, DayCountConvention};
use pricer_models::instruments::{Barrier, BarrierType, ContractSpec, ExerciseStyle, OptionType};
use tracing::info;

/// Field set of one pricing request.
///
/// Rates and volatility are decimal fractions. With the `serde` feature the
/// struct deserialises from camelCase JSON; `optionExercise` and
/// `pricingEngine` are accepted as aliases.
///
/// # Examples
/// ```
/// use pricer_pricing::{PricingRequest, RequestRoute};
///
/// let request: PricingRequest = serde_json::from_str(r#"{
///     "spot": 100.0, "strike": 100.0, "volatility": 0.2, "riskFreeRate": 0.05,
///     "maturity": 365, "optionType": "Call", "exerciseStyle": "European",
///     "pricingMethod": "FD", "barrier": 80.0, "barrierType": "DownOut"
/// }"#).unwrap();
///
/// assert_eq!(request.route().unwrap(), RequestRoute::Barrier);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct PricingRequest {
    /// Spot price
    pub spot: f64,
    /// Strike price
    pub strike: f64,
    /// Volatility, decimal
    pub volatility: f64,
    /// Risk-free rate, decimal
    pub risk_free_rate: f64,
    /// Continuous dividend yield, decimal; 0 when absent
    #[cfg_attr(feature = "serde", serde(default))]
    pub dividend_yield: Option<f64>,
    /// Calendar days to maturity
    pub maturity: i64,
    /// `Call` or `Put`
    pub option_type: String,
    /// `European` or `American`
    #[cfg_attr(feature = "serde", serde(alias = "optionExercise"))]
    pub exercise_style: String,
    /// Method name, see [`MethodKind`]
    #[cfg_attr(feature = "serde", serde(alias = "pricingEngine"))]
    pub pricing_method: String,
    /// Barrier level
    #[cfg_attr(feature = "serde", serde(default))]
    pub barrier: Option<f64>,
    /// `DownIn`, `DownOut`, `UpIn` or `UpOut`
    #[cfg_attr(feature = "serde", serde(default))]
    pub barrier_type: Option<String>,
    /// Barrier rebate; 0 when absent
    #[cfg_attr(feature = "serde", serde(default))]
    pub rebate: Option<f64>,
    /// Valuation date; today when absent
    #[cfg_attr(feature = "serde", serde(default))]
    pub valuation_date: Option<Date>,
    /// Year-fraction convention, `ACT/365`, `ACT/360` or `30/360`; ACT/365
    /// when absent
    #[cfg_attr(feature = "serde", serde(default))]
    pub day_count: Option<DayCountConvention>,
}

/// Contract family a request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestRoute {
    /// No barrier level
    Vanilla,
    /// Barrier level and type present
    Barrier,
}

impl PricingRequest {
    /// Classifies the request by its barrier fields.
    ///
    /// # Errors
    /// `ValuationError::MissingField("barrierType")` when a barrier level
    /// comes without its type.
    pub fn route(&self) -> Result<RequestRoute, ValuationError> {
        match (self.barrier, &self.barrier_type) {
            (None, _) => Ok(RequestRoute::Vanilla),
            (Some(_), Some(_)) => Ok(RequestRoute::Barrier),
            (Some(_), None) => Err(ValuationError::MissingField("barrierType")),
        }
    }

    /// Parses the enumerated fields and checks the contract terms.
    pub fn contract_spec(&self) -> Result<ContractSpec, ValuationError> {
        let route = self.route()?;
        let option_type: OptionType = self.option_type.parse()?;
        let exercise_style: ExerciseStyle = self.exercise_style.parse()?;
        let barrier_type: Option<BarrierType> = match (route, &self.barrier_type) {
            (RequestRoute::Barrier, Some(name)) => Some(name.parse()?),
            _ => None,
        };
        let _: MethodKind = self.pricing_method.parse()?;

        let mut spec =
            ContractSpec::vanilla(option_type, self.strike, exercise_style, self.maturity);
        spec.validate()?;
        if let (Some(barrier_type), Some(level)) = (barrier_type, self.barrier) {
            let barrier = Barrier::new(barrier_type, level, self.rebate.unwrap_or(0.0))?;
            spec = spec.with_barrier(barrier);
        }
        Ok(spec)
    }

    /// Market snapshot at the requested (or today's) valuation date, under
    /// the requested day count.
    pub fn snapshot(&self) -> MarketSnapshot {
        let valuation_date = self.valuation_date.unwrap_or_else(Date::today);
        MarketSnapshot::new(valuation_date, self.spot, self.volatility, self.risk_free_rate)
            .with_dividend_yield(self.dividend_yield.unwrap_or(0.0))
            .with_day_count(self.day_count.unwrap_or_default())
    }
}

/// Prices `request` end to end.
///
/// # Errors
/// - `ValuationError::ConfigError` for invalid `settings`
/// - `ValuationError::MissingField` for a barrier without a type
/// - an invalid-field error for any unrecognised name
/// - `ValuationError::InvalidInput` for out-of-range numbers
/// - `ValuationError::UnsupportedContractShape` when the method cannot price the contract
///
/// Engine failures are not errors; they yield an all-unavailable result set.
///
/// # Examples
/// ```
/// use pricer_pricing::{price_request, EngineSettings, PricingRequest};
///
/// let request = PricingRequest {
///     spot: 100.0,
///     strike: 100.0,
///     volatility: 0.2,
///     risk_free_rate: 0.05,
///     dividend_yield: None,
///     maturity: 365,
///     option_type: "Call".to_string(),
///     exercise_style: "European".to_string(),
///     pricing_method: "Analytical".to_string(),
///     barrier: None,
///     barrier_type: None,
///     rebate: None,
///     valuation_date: None,
///     day_count: None,
/// };
///
/// let results = price_request(&request, &EngineSettings::default()).unwrap();
/// assert!((results.npv() - 10.45).abs() < 0.01);
/// ```
pub fn price_request(
    request: &PricingRequest,
    settings: &EngineSettings,
) -> Result<ResultSet, ValuationError> {
    settings.validate()?;
    let spec = request.contract_spec()?;
    let method = select_method(&request.pricing_method, spec.shape(), settings)?;
    let snapshot = request.snapshot();

    let results = value_contract(&spec, &snapshot, &method, settings)?;
    info!(
        method = method.kind().name(),
        shape = %spec.shape(),
        valuation_date = %snapshot.valuation_date(),
        npv = results.npv(),
        "Priced request"
    );
    Ok(results)
}
