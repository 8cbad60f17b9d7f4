//! Pricing engines.
//!
//! Every engine prices an [`OptionContract`] against a
//! [`BlackScholesProcess`] and reports the quantities it computes natively:
//!
//! | Engine | Shapes | Native quantities |
//! |--------|--------|-------------------|
//! | [`AnalyticEuropeanEngine`] | European vanilla | NPV, delta, gamma, vega, theta, rho |
//! | [`AnalyticBarrierEngine`] | European barrier | NPV |
//! | [`FdBlackScholesEngine`] | all | NPV, delta, gamma, theta |
//! | [`MonteCarloEngine`] | European vanilla and barrier | NPV, error estimate |
//! | [`BinomialEngine`] | all | NPV, delta, gamma, theta |
//!
//! Engines read market values from the process's quotes on every call, so a
//! bumped quote is observed by the next `calculate`.

mod analytic_barrier;
mod analytic_european;
mod binomial;
mod finite_difference;
mod monte_carlo;

pub use analytic_barrier::AnalyticBarrierEngine;
pub use analytic_european::AnalyticEuropeanEngine;
pub use binomial::BinomialEngine;
pub use finite_difference::FdBlackScholesEngine;
pub use monte_carlo::MonteCarloEngine;

use crate::greeks::Quantity;
use pricer_core::types::PricingError;
use pricer_models::instruments::{ContractShape, OptionContract};
use pricer_models::models::BlackScholesProcess;

/// Common interface of all engines.
pub trait PricingEngine {
    /// Canonical method name.
    fn name(&self) -> &'static str;

    /// Whether the engine can price contracts of this shape.
    fn supports(&self, shape: ContractShape) -> bool;

    /// Prices `contract` at the current quote values.
    ///
    /// # Errors
    /// - `PricingError::UnsupportedInstrument` for an unsupported shape
    /// - `PricingError::BarrierTouched` if spot is already beyond the barrier
    /// - `PricingError::InvalidInput` for unusable market values
    fn calculate(
        &self,
        contract: &OptionContract,
        process: &BlackScholesProcess,
    ) -> Result<EngineResults, PricingError>;
}

/// Output of one engine calculation.
///
/// Greeks are per unit of the underlying input; theta is per year.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EngineResults {
    /// Net present value
    pub npv: f64,
    /// Standard error of the estimate (Monte Carlo only)
    pub error_estimate: Option<f64>,
    /// dV/dS
    pub delta: Option<f64>,
    /// d2V/dS2
    pub gamma: Option<f64>,
    /// dV/dsigma
    pub vega: Option<f64>,
    /// dV/dt
    pub theta: Option<f64>,
    /// dV/dr
    pub rho: Option<f64>,
}

impl EngineResults {
    /// Result carrying only an NPV.
    #[inline]
    pub fn npv_only(npv: f64) -> Self {
        Self {
            npv,
            ..Default::default()
        }
    }

    /// Reads one quantity.
    ///
    /// # Errors
    /// `PricingError::QuantityUnavailable` if the engine did not compute it.
    pub fn get(&self, quantity: Quantity) -> Result<f64, PricingError> {
        let value = match quantity {
            Quantity::Npv => Some(self.npv),
            Quantity::Delta => self.delta,
            Quantity::Vega => self.vega,
            Quantity::Theta => self.theta,
            Quantity::Rho => self.rho,
            Quantity::Gamma => self.gamma,
        };
        value.ok_or(PricingError::QuantityUnavailable(quantity.name()))
    }
}

/// Rejects contracts the engine cannot price.
pub(crate) fn ensure_supported<E: PricingEngine + ?Sized>(
    engine: &E,
    contract: &OptionContract,
) -> Result<(), PricingError> {
    let shape = contract.shape();
    if engine.supports(shape) {
        Ok(())
    } else {
        Err(PricingError::UnsupportedInstrument(format!(
            "{} cannot price a {} contract",
            engine.name(),
            shape
        )))
    }
}

/// Fails when spot already sits on or beyond the barrier.
pub(crate) fn ensure_barrier_alive(contract: &OptionContract, spot: f64) -> Result<(), PricingError> {
    match contract.barrier() {
        Some(barrier) if barrier.is_touched(spot) => {
            Err(PricingError::barrier_touched(spot, barrier.level))
        }
        _ => Ok(()),
    }
}

/// Value of a contract at or past its last exercise date.
///
/// The barrier is known to be untouched, so a knock-out pays the payoff and
/// a knock-in pays its rebate.
pub(crate) fn expired_value(contract: &OptionContract, spot: f64) -> EngineResults {
    let npv = match contract.barrier() {
        Some(barrier) if barrier.barrier_type.is_knock_in() => barrier.rebate,
        _ => contract.payoff().value(spot),
    };
    EngineResults::npv_only(npv)
}

/// Theta from the Black-Scholes PDE, given value, delta and gamma.
#[inline]
pub(crate) fn pde_theta(process: &BlackScholesProcess, npv: f64, delta: f64, gamma: f64) -> f64 {
    let s = process.spot();
    let r = process.rate();
    let q = process.dividend_yield();
    let sigma = process.volatility();
    r * npv - (r - q) * s * delta - 0.5 * sigma * sigma * s * s * gamma
}
