//! Black-Scholes-Merton process linked to market quotes.
//!
//! The process holds quote handles rather than values:
//! ```text
//! dS = (r - q) * S * dt + sigma * S * dW
//! ```
//! where r, q and sigma are read from the snapshot's quotes every time they
//! are needed. Bumping a quote is therefore observed by every engine that
//! prices against the process, without rebuilding it.
//!
//! ## Log-space formulation
//!
//! Path evolution uses the exact solution:
//! ```text
//! S(t+dt) = S(t) * exp((r - q - 0.5*sigma^2)*dt + sigma*sqrt(dt)*Z)
//! ```

use pricer_core::market_data::curves::{FlatForward, YieldCurve};
use pricer_core::market_data::surfaces::BlackConstantVol;
use pricer_core::market_data::{MarketSnapshot, SimpleQuote};
use pricer_core::types::{Date, DayCountConvention, PricingError};

use crate::analytical::{AnalyticalError, BlackScholes};

/// Black-Scholes-Merton process with flat, quote-linked term structures.
///
/// # Examples
/// ```
/// use pricer_core::market_data::MarketSnapshot;
/// use pricer_core::types::Date;
/// use pricer_models::models::BlackScholesProcess;
///
/// let today = Date::from_ymd(2024, 1, 2).unwrap();
/// let snapshot = MarketSnapshot::new(today, 100.0, 0.2, 0.05);
/// let process = BlackScholesProcess::from_snapshot(&snapshot);
///
/// let _bump = snapshot.spot().bump(101.0);
/// assert_eq!(process.spot(), 101.0);
/// ```
#[derive(Debug, Clone)]
pub struct BlackScholesProcess {
    valuation_date: Date,
    spot: SimpleQuote,
    risk_free: FlatForward,
    dividend: FlatForward,
    volatility: BlackConstantVol,
}

impl BlackScholesProcess {
    /// Builds the process from a snapshot, linking every quote.
    pub fn from_snapshot(snapshot: &MarketSnapshot) -> Self {
        let day_count = snapshot.day_count();
        let valuation_date = snapshot.valuation_date();
        Self {
            valuation_date,
            spot: snapshot.spot().clone(),
            risk_free: FlatForward::new(
                valuation_date,
                snapshot.risk_free_rate().clone(),
                day_count,
            ),
            dividend: FlatForward::new(
                valuation_date,
                snapshot.dividend_yield().clone(),
                day_count,
            ),
            volatility: BlackConstantVol::new(snapshot.volatility().clone(), day_count),
        }
    }

    /// Copy of the process valued at another date, sharing the same quotes.
    ///
    /// ```
    /// use pricer_core::market_data::MarketSnapshot;
    /// use pricer_core::types::Date;
    /// use pricer_models::models::BlackScholesProcess;
    ///
    /// let today = Date::from_ymd(2024, 1, 2).unwrap();
    /// let process = BlackScholesProcess::from_snapshot(&MarketSnapshot::new(today, 100.0, 0.2, 0.05));
    /// let tomorrow = process.with_valuation_date(today.add_days(1).unwrap());
    ///
    /// assert_eq!(process.valuation_date(), today);
    /// assert_eq!(tomorrow.valuation_date(), today.add_days(1).unwrap());
    /// ```
    pub fn with_valuation_date(&self, valuation_date: Date) -> Self {
        Self {
            valuation_date,
            spot: self.spot.clone(),
            risk_free: self.risk_free.with_reference_date(valuation_date),
            dividend: self.dividend.with_reference_date(valuation_date),
            volatility: self.volatility.clone(),
        }
    }

    /// Valuation date.
    #[inline]
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    /// Day count used for all year fractions.
    #[inline]
    pub fn day_count(&self) -> DayCountConvention {
        self.risk_free.day_count()
    }

    /// Current spot.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot.value()
    }

    /// Current risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.risk_free.rate()
    }

    /// Current dividend yield.
    #[inline]
    pub fn dividend_yield(&self) -> f64 {
        self.dividend.rate()
    }

    /// Current volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility.sigma()
    }

    /// Spot quote handle.
    pub fn spot_quote(&self) -> &SimpleQuote {
        &self.spot
    }

    /// Risk-free rate quote handle.
    pub fn rate_quote(&self) -> &SimpleQuote {
        self.risk_free.rate_quote()
    }

    /// Volatility quote handle.
    pub fn volatility_quote(&self) -> &SimpleQuote {
        self.volatility.sigma_quote()
    }

    /// Risk-free curve.
    pub fn risk_free_curve(&self) -> &FlatForward {
        &self.risk_free
    }

    /// Dividend curve.
    pub fn dividend_curve(&self) -> &FlatForward {
        &self.dividend
    }

    /// Volatility term structure.
    pub fn volatility_surface(&self) -> &BlackConstantVol {
        &self.volatility
    }

    /// Year fraction from the valuation date to `date` (negative if past).
    #[inline]
    pub fn time_to(&self, date: Date) -> f64 {
        self.day_count().year_fraction(self.valuation_date, date)
    }

    /// Risk-free discount factor for year fraction `t`.
    pub fn discount(&self, t: f64) -> Result<f64, PricingError> {
        Ok(self.risk_free.discount_factor(t)?)
    }

    /// Log-space drift `r - q - σ²/2`.
    #[inline]
    pub fn log_drift(&self) -> f64 {
        let sigma = self.volatility();
        self.rate() - self.dividend_yield() - 0.5 * sigma * sigma
    }

    /// Evolves `s` over `dt` with standard normal draw `z`.
    #[inline]
    pub fn evolve(&self, s: f64, dt: f64, z: f64) -> f64 {
        s * (self.log_drift() * dt + self.volatility() * dt.sqrt() * z).exp()
    }

    /// Checks that the current quote values define a usable process.
    pub fn validate(&self) -> Result<(), PricingError> {
        let spot = self.spot();
        if !spot.is_finite() || spot <= 0.0 {
            return Err(PricingError::InvalidInput(format!("spot must be positive, got {}", spot)));
        }
        let sigma = self.volatility();
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "volatility must be non-negative, got {}",
                sigma
            )));
        }
        if !self.rate().is_finite() || !self.dividend_yield().is_finite() {
            return Err(PricingError::InvalidInput("rates must be finite".to_string()));
        }
        Ok(())
    }

    /// Closed-form model at the current quote values.
    pub fn black_scholes(&self) -> Result<BlackScholes<f64>, AnalyticalError> {
        Ok(BlackScholes::new(self.spot(), self.rate(), self.volatility())?
            .with_dividend(self.dividend_yield()))
    }
}
