//! Market snapshot: the quotes and valuation date one request is priced against.

use super::error::MarketDataError;
use super::quote::SimpleQuote;
use crate::types::{Date, DayCountConvention};

/// Spot, volatility, risk-free rate and dividend yield quotes plus the
/// valuation date.
///
/// The valuation date is fixed at construction. Quotes are shared handles:
/// anything built from a snapshot observes later quote changes.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::MarketSnapshot;
/// use pricer_core::types::Date;
///
/// let today = Date::from_ymd(2024, 1, 2).unwrap();
/// let snapshot = MarketSnapshot::new(today, 100.0, 0.20, 0.05).with_dividend_yield(0.02);
///
/// assert_eq!(snapshot.spot().value(), 100.0);
/// assert_eq!(snapshot.dividend_yield().value(), 0.02);
/// assert!(snapshot.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    valuation_date: Date,
    day_count: DayCountConvention,
    spot: SimpleQuote,
    volatility: SimpleQuote,
    risk_free_rate: SimpleQuote,
    dividend_yield: SimpleQuote,
}

impl MarketSnapshot {
    /// Snapshot with zero dividend yield and Actual/365 Fixed day count.
    pub fn new(valuation_date: Date, spot: f64, volatility: f64, risk_free_rate: f64) -> Self {
        Self {
            valuation_date,
            day_count: DayCountConvention::default(),
            spot: SimpleQuote::new("spot", spot),
            volatility: SimpleQuote::new("volatility", volatility),
            risk_free_rate: SimpleQuote::new("riskFreeRate", risk_free_rate),
            dividend_yield: SimpleQuote::new("dividendYield", 0.0),
        }
    }

    /// Sets the continuous dividend yield.
    pub fn with_dividend_yield(self, dividend_yield: f64) -> Self {
        self.dividend_yield.set_value(dividend_yield);
        self
    }

    /// Sets the day count convention.
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Valuation date.
    #[inline]
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    /// Day count convention for all term structures built from this snapshot.
    #[inline]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Spot quote.
    #[inline]
    pub fn spot(&self) -> &SimpleQuote {
        &self.spot
    }

    /// Volatility quote.
    #[inline]
    pub fn volatility(&self) -> &SimpleQuote {
        &self.volatility
    }

    /// Risk-free rate quote.
    #[inline]
    pub fn risk_free_rate(&self) -> &SimpleQuote {
        &self.risk_free_rate
    }

    /// Dividend yield quote.
    #[inline]
    pub fn dividend_yield(&self) -> &SimpleQuote {
        &self.dividend_yield
    }

    /// Checks the current quote values.
    ///
    /// Spot must be finite and positive, volatility finite and non-negative,
    /// rates finite. A zero volatility prices the deterministic forward.
    pub fn validate(&self) -> Result<(), MarketDataError> {
        let spot = self.spot.value();
        if !spot.is_finite() || spot <= 0.0 {
            return Err(MarketDataError::InvalidSpot { spot });
        }
        let sigma = self.volatility.value();
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(MarketDataError::InvalidVolatility { sigma });
        }
        for quote in [&self.risk_free_rate, &self.dividend_yield] {
            if !quote.value().is_finite() {
                return Err(MarketDataError::NonFiniteQuote {
                    name: quote.name().to_string(),
                    value: quote.value(),
                });
            }
        }
        Ok(())
    }
}
