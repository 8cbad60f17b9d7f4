//! Integration tests for module exports.
//!
//! Verifies that the public types are reachable through their absolute paths
//! and cooperate across modules.

use pricer_core::market_data::curves::{FlatForward, YieldCurve};
use pricer_core::market_data::surfaces::{BlackConstantVol, VolatilitySurface};
use pricer_core::market_data::{MarketDataError, MarketSnapshot, QuoteBump, SimpleQuote};
use pricer_core::types::{Date, DateError, DayCountConvention, PricingError};

fn snapshot() -> MarketSnapshot {
    MarketSnapshot::new(Date::from_ymd(2024, 1, 2).unwrap(), 100.0, 0.20, 0.05)
}

#[test]
fn test_types_module_exports() {
    let d = Date::from_ymd(2024, 3, 1).unwrap();
    assert_eq!(d.to_string(), "2024-03-01");

    let err: Result<Date, DateError> = Date::parse("2024-13-01");
    assert!(err.is_err());

    let pricing: PricingError = DateError::ParseError("x".to_string()).into();
    assert!(matches!(pricing, PricingError::InvalidInput(_)));
}

#[test]
fn test_term_structures_follow_snapshot_quotes() {
    let s = snapshot();
    let curve = FlatForward::new(s.valuation_date(), s.risk_free_rate().clone(), s.day_count());
    let vol = BlackConstantVol::new(s.volatility().clone(), s.day_count());

    let df_before = curve.discount_factor(1.0).unwrap();
    {
        let _rate: QuoteBump<'_> = s.risk_free_rate().bump(0.10);
        let _vol = s.volatility().bump(0.30);
        assert!(curve.discount_factor(1.0).unwrap() < df_before);
        assert_eq!(vol.volatility(100.0, 1.0).unwrap(), 0.30);
    }
    assert_eq!(curve.discount_factor(1.0).unwrap(), df_before);
    assert_eq!(vol.volatility(100.0, 1.0).unwrap(), 0.20);
}

#[test]
fn test_market_data_error_into_pricing_error() {
    let s = MarketSnapshot::new(Date::from_ymd(2024, 1, 2).unwrap(), -1.0, 0.2, 0.05);
    let err: MarketDataError = s.validate().unwrap_err();
    let pricing: PricingError = err.into();
    assert!(pricing.to_string().contains("spot"));
}

#[test]
fn test_quote_identity_across_clones() {
    let s = snapshot();
    let handle: SimpleQuote = s.spot().clone();
    assert!(handle.shares_cell_with(s.spot()));
    assert_eq!(handle.name(), "spot");
}

#[test]
fn test_day_count_year_fraction_one_year() {
    let s = snapshot();
    let maturity = s.valuation_date().add_days(365).unwrap();
    let t = DayCountConvention::Actual365Fixed.year_fraction(s.valuation_date(), maturity);
    assert_eq!(t, 1.0);
}
