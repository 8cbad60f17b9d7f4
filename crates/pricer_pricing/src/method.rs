//! Numerical method selection.
//!
//! Method names are parsed case-insensitively:
//!
//! | Method | Accepted names |
//! |--------|----------------|
//! | Analytical | `Analytical` |
//! | AnalyticalBinary | `AnalyticalBinary` |
//! | FiniteDifferenceGrid | `FD`, `FiniteDifference`, `FiniteDifferenceGrid` |
//! | MonteCarlo | `MC`, `MonteCarlo` |
//! | BinomialTree | `Binomial`, `BinomialTree` |
//!
//! [`select_method`] pairs the parsed name with the engine settings and
//! rejects contract shapes the method cannot price.

use crate::engines::{
    AnalyticBarrierEngine, AnalyticEuropeanEngine, BinomialEngine, EngineResults,
    FdBlackScholesEngine, MonteCarloEngine, PricingEngine,
};
use crate::error::ValuationError;
use crate::settings::{BinomialSettings, EngineSettings, FiniteDifferenceSettings, MonteCarloSettings};
use pricer_core::types::PricingError;
use pricer_models::instruments::{ContractShape, OptionContract};
use pricer_models::models::BlackScholesProcess;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Method family, as named in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// Black-Scholes closed form
    Analytical,
    /// Reiner-Rubinstein barrier closed form
    AnalyticalBinary,
    /// Crank-Nicolson grid
    FiniteDifferenceGrid,
    /// Pseudorandom Monte Carlo
    MonteCarlo,
    /// Jarrow-Rudd lattice
    BinomialTree,
}

impl MethodKind {
    /// All method families.
    pub const ALL: [MethodKind; 5] = [
        MethodKind::Analytical,
        MethodKind::AnalyticalBinary,
        MethodKind::FiniteDifferenceGrid,
        MethodKind::MonteCarlo,
        MethodKind::BinomialTree,
    ];

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            MethodKind::Analytical => "Analytical",
            MethodKind::AnalyticalBinary => "AnalyticalBinary",
            MethodKind::FiniteDifferenceGrid => "FiniteDifferenceGrid",
            MethodKind::MonteCarlo => "MonteCarlo",
            MethodKind::BinomialTree => "BinomialTree",
        }
    }

    /// Attaches numerical parameters from `settings`.
    pub fn configure(&self, settings: &EngineSettings) -> PricingMethod {
        match self {
            MethodKind::Analytical => PricingMethod::Analytical,
            MethodKind::AnalyticalBinary => PricingMethod::AnalyticalBinary,
            MethodKind::FiniteDifferenceGrid => {
                PricingMethod::FiniteDifferenceGrid(settings.finite_difference)
            }
            MethodKind::MonteCarlo => PricingMethod::MonteCarlo(settings.monte_carlo.clone()),
            MethodKind::BinomialTree => PricingMethod::BinomialTree(settings.binomial),
        }
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MethodKind {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "analytical" => Ok(MethodKind::Analytical),
            "analyticalbinary" => Ok(MethodKind::AnalyticalBinary),
            "fd" | "finitedifference" | "finitedifferencegrid" => {
                Ok(MethodKind::FiniteDifferenceGrid)
            }
            "mc" | "montecarlo" => Ok(MethodKind::MonteCarlo),
            "binomial" | "binomialtree" => Ok(MethodKind::BinomialTree),
            _ => Err(ValuationError::UnsupportedMethod(s.to_string())),
        }
    }
}

/// A configured pricing method.
///
/// Dispatch to the engines is static; the enum itself implements
/// [`PricingEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum PricingMethod {
    /// Black-Scholes closed form
    Analytical,
    /// Reiner-Rubinstein barrier closed form
    AnalyticalBinary,
    /// Crank-Nicolson grid
    FiniteDifferenceGrid(FiniteDifferenceSettings),
    /// Pseudorandom Monte Carlo
    MonteCarlo(MonteCarloSettings),
    /// Jarrow-Rudd lattice
    BinomialTree(BinomialSettings),
}

impl PricingMethod {
    /// Method family.
    pub fn kind(&self) -> MethodKind {
        match self {
            PricingMethod::Analytical => MethodKind::Analytical,
            PricingMethod::AnalyticalBinary => MethodKind::AnalyticalBinary,
            PricingMethod::FiniteDifferenceGrid(_) => MethodKind::FiniteDifferenceGrid,
            PricingMethod::MonteCarlo(_) => MethodKind::MonteCarlo,
            PricingMethod::BinomialTree(_) => MethodKind::BinomialTree,
        }
    }
}

impl PricingEngine for PricingMethod {
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    fn supports(&self, shape: ContractShape) -> bool {
        match self {
            PricingMethod::Analytical => AnalyticEuropeanEngine.supports(shape),
            PricingMethod::AnalyticalBinary => AnalyticBarrierEngine.supports(shape),
            PricingMethod::FiniteDifferenceGrid(s) => FdBlackScholesEngine::new(*s).supports(shape),
            PricingMethod::MonteCarlo(s) => MonteCarloEngine::new(s.clone()).supports(shape),
            PricingMethod::BinomialTree(s) => BinomialEngine::new(*s).supports(shape),
        }
    }

    fn calculate(
        &self,
        contract: &OptionContract,
        process: &BlackScholesProcess,
    ) -> Result<EngineResults, PricingError> {
        match self {
            PricingMethod::Analytical => AnalyticEuropeanEngine.calculate(contract, process),
            PricingMethod::AnalyticalBinary => AnalyticBarrierEngine.calculate(contract, process),
            PricingMethod::FiniteDifferenceGrid(s) => {
                FdBlackScholesEngine::new(*s).calculate(contract, process)
            }
            PricingMethod::MonteCarlo(s) => {
                MonteCarloEngine::new(s.clone()).calculate(contract, process)
            }
            PricingMethod::BinomialTree(s) => BinomialEngine::new(*s).calculate(contract, process),
        }
    }
}

/// Parses `name`, configures it and checks it can price `shape`.
///
/// # Errors
/// - `ValuationError::UnsupportedMethod` for an unknown name
/// - `ValuationError::UnsupportedContractShape` when the method cannot price the contract
///
/// # Examples
/// ```
/// use pricer_models::instruments::{ContractShape, ExerciseStyle};
/// use pricer_pricing::engines::PricingEngine;
/// use pricer_pricing::{select_method, EngineSettings, ValuationError};
///
/// let settings = EngineSettings::default();
/// let barrier = ContractShape { has_barrier: true, exercise_style: ExerciseStyle::European };
///
/// let fd = select_method("fd", barrier, &settings).unwrap();
/// assert_eq!(fd.name(), "FiniteDifferenceGrid");
///
/// let err = select_method("Analytical", barrier, &settings).unwrap_err();
/// assert!(matches!(err, ValuationError::UnsupportedContractShape { .. }));
/// ```
pub fn select_method(
    name: &str,
    shape: ContractShape,
    settings: &EngineSettings,
) -> Result<PricingMethod, ValuationError> {
    let kind: MethodKind = name.parse()?;
    let method = kind.configure(settings);
    if !method.supports(shape) {
        return Err(ValuationError::UnsupportedContractShape {
            method: kind.name(),
            shape,
        });
    }
    debug!(method = kind.name(), %shape, "Selected pricing method");
    Ok(method)
}
