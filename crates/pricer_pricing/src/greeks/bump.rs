//! Bump-and-reprice sensitivity estimator.
//!
//! Fills the Greeks a method does not supply natively:
//!
//! | Greek | Quote | Formula |
//! |-------|-------|---------|
//! | delta | spot | `(P+ - P-) / 2h` |
//! | gamma | spot | `(P+ + P- - 2 P0) / h^2` |
//! | rho | rate | `(P+ - P-) / 2h` |
//! | vega | volatility | `(P+ - P-) / 2h` |
//! | theta | valuation date | `(P1 - P0) / (days / 365)` |
//!
//! with `h = v0 * relative` for a quote currently at `v0`. Every quote
//! change goes through [`SimpleQuote::bump`], whose guard restores the
//! original bits on drop. Theta reprices on a copy of the process with an
//! advanced valuation date.

use super::result::{Quantity, QuantityValue, ResultSet};
use crate::engines::PricingEngine;
use crate::settings::BumpSettings;
use pricer_core::market_data::SimpleQuote;
use pricer_models::instruments::OptionContract;
use pricer_models::models::BlackScholesProcess;
use tracing::debug;

/// Days per year in the theta denominator.
const DAYS_PER_YEAR: f64 = 365.0;

/// Fills unavailable Greeks by repricing under perturbed quotes.
///
/// # Examples
/// ```
/// use pricer_core::market_data::MarketSnapshot;
/// use pricer_core::types::Date;
/// use pricer_models::instruments::{ContractSpec, ExerciseStyle, OptionType};
/// use pricer_models::models::BlackScholesProcess;
/// use pricer_pricing::greeks::{BumpEstimator, Quantity, QuantityValue, ResultSet};
/// use pricer_pricing::settings::BumpSettings;
/// use pricer_pricing::PricingMethod;
///
/// let today = Date::from_ymd(2024, 1, 2).unwrap();
/// let snapshot = MarketSnapshot::new(today, 100.0, 0.2, 0.05);
/// let process = BlackScholesProcess::from_snapshot(&snapshot);
/// let contract = ContractSpec::vanilla(OptionType::Call, 100.0, ExerciseStyle::European, 365)
///     .anchor(today)
///     .unwrap();
///
/// let method = PricingMethod::Analytical;
/// let estimator = BumpEstimator::new(&method, &contract, &process, BumpSettings::default());
///
/// let mut results = ResultSet::unavailable();
/// results.set(Quantity::Npv, QuantityValue::Engine(10.450583572185565));
/// estimator.fill(&mut results);
///
/// assert!(matches!(results.get(Quantity::Vega), QuantityValue::Bumped(_)));
/// assert_eq!(snapshot.volatility().value(), 0.2);
/// ```
pub struct BumpEstimator<'a, E: PricingEngine + ?Sized> {
    engine: &'a E,
    contract: &'a OptionContract,
    process: &'a BlackScholesProcess,
    settings: BumpSettings,
}

impl<'a, E: PricingEngine + ?Sized> BumpEstimator<'a, E> {
    /// Estimator repricing `contract` with `engine` against `process`.
    pub fn new(
        engine: &'a E,
        contract: &'a OptionContract,
        process: &'a BlackScholesProcess,
        settings: BumpSettings,
    ) -> Self {
        Self {
            engine,
            contract,
            process,
            settings,
        }
    }

    /// Fills every `Unavailable` Greek in the order delta, gamma, rho,
    /// vega, theta. Entries already present are left untouched. Never fails;
    /// a failed repricing is recorded as `Bumped(NaN)`.
    pub fn fill(&self, results: &mut ResultSet) {
        let p0 = results.npv();
        for quantity in [
            Quantity::Delta,
            Quantity::Gamma,
            Quantity::Rho,
            Quantity::Vega,
            Quantity::Theta,
        ] {
            if results.get(quantity).is_available() {
                continue;
            }
            let value = match quantity {
                Quantity::Delta => self.first_order(self.process.spot_quote()),
                Quantity::Gamma => self.second_order(self.process.spot_quote(), p0),
                Quantity::Rho => self.first_order(self.process.rate_quote()),
                Quantity::Vega => self.first_order(self.process.volatility_quote()),
                Quantity::Theta => self.theta(p0),
                Quantity::Npv => continue,
            };
            debug!(quantity = quantity.name(), value, "Bumped sensitivity");
            results.set(quantity, QuantityValue::Bumped(value));
        }
    }

    /// Central first derivative with respect to `quote`.
    ///
    /// A quote at zero gives `h = 0` and a NaN or infinite result.
    pub fn first_order(&self, quote: &SimpleQuote) -> f64 {
        let v0 = quote.value();
        let h = v0 * self.settings.relative;

        let bump = quote.bump(v0 + h);
        let p_plus = self.reprice(self.process);
        bump.set(v0 - h);
        let p_minus = self.reprice(self.process);
        drop(bump);

        (p_plus - p_minus) / (2.0 * h)
    }

    /// Central second derivative with respect to `quote`, given the base NPV.
    pub fn second_order(&self, quote: &SimpleQuote, p0: f64) -> f64 {
        let v0 = quote.value();
        let h = v0 * self.settings.relative;

        let bump = quote.bump(v0 + h);
        let p_plus = self.reprice(self.process);
        bump.set(v0 - h);
        let p_minus = self.reprice(self.process);
        drop(bump);

        (p_plus + p_minus - 2.0 * p0) / (h * h)
    }

    /// One-sided time decay per year over `theta_days` calendar days.
    pub fn theta(&self, p0: f64) -> f64 {
        let days = self.settings.theta_days;
        let advanced = match self.process.valuation_date().add_days(i64::from(days)) {
            Ok(date) => self.process.with_valuation_date(date),
            Err(e) => {
                debug!(error = %e, "Cannot advance valuation date for theta");
                return f64::NAN;
            }
        };
        let p1 = self.reprice(&advanced);
        (p1 - p0) / (f64::from(days) / DAYS_PER_YEAR)
    }

    /// NPV under the current quotes; NaN when the engine fails.
    fn reprice(&self, process: &BlackScholesProcess) -> f64 {
        match self.engine.calculate(self.contract, process) {
            Ok(results) => results.npv,
            Err(e) => {
                debug!(error = %e, "Repricing failed");
                f64::NAN
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::test_support::*;
    use crate::engines::AnalyticEuropeanEngine;
    use approx::assert_relative_eq;
    use pricer_models::analytical::Greeks;
    use pricer_models::instruments::{BarrierType, ExerciseStyle, OptionType};
    use proptest::prelude::*;

    fn analytic_greeks(option_type: OptionType, strike: f64) -> Greeks<f64> {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        process
            .black_scholes()
            .unwrap()
            .greeks(option_type, strike, 1.0)
    }

    fn estimator_error(relative: f64) -> [f64; 4] {
        let snapshot = snapshot(100.0, 0.2, 0.05);
        let process = BlackScholesProcess::from_snapshot(&snapshot);
        let contract = vanilla(OptionType::Call, 100.0, ExerciseStyle::European, 365);
        let settings = BumpSettings {
            relative,
            ..Default::default()
        };
        let estimator = BumpEstimator::new(&AnalyticEuropeanEngine, &contract, &process, settings);
        let p0 = AnalyticEuropeanEngine.calculate(&contract, &process).unwrap().npv;
        let exact = analytic_greeks(OptionType::Call, 100.0);

        [
            (estimator.first_order(snapshot.spot()) - exact.delta).abs(),
            (estimator.second_order(snapshot.spot(), p0) - exact.gamma).abs(),
            (estimator.first_order(snapshot.volatility()) - exact.vega).abs(),
            (estimator.first_order(snapshot.risk_free_rate()) - exact.rho).abs(),
        ]
    }

    // ========================================================================
    // Convergence
    // ========================================================================

    #[test]
    fn test_bumped_greeks_converge_to_analytic() {
        let coarse = estimator_error(0.01);
        let fine = estimator_error(0.001);
        for (c, f) in coarse.iter().zip(fine.iter()) {
            assert!(f <= c, "fine {f} should not exceed coarse {c}");
        }
        assert!(fine[0] < 1e-5);
        assert!(fine[1] < 1e-5);
        assert!(fine[2] < 1e-3);
        assert!(fine[3] < 1e-3);
    }

    #[test]
    fn test_theta_is_one_sided() {
        let snapshot = snapshot(100.0, 0.2, 0.05);
        let process = BlackScholesProcess::from_snapshot(&snapshot);
        let contract = vanilla(OptionType::Call, 100.0, ExerciseStyle::European, 365);
        let estimator =
            BumpEstimator::new(&AnalyticEuropeanEngine, &contract, &process, BumpSettings::default());
        let p0 = AnalyticEuropeanEngine.calculate(&contract, &process).unwrap().npv;

        let theta = estimator.theta(p0);
        let exact = analytic_greeks(OptionType::Call, 100.0).theta;
        assert_relative_eq!(theta, exact, epsilon = 0.05);

        // A central estimate over +-1 day differs from the forward one.
        let bs = process.black_scholes().unwrap();
        let central = (bs.price_call(100.0, 364.0 / 365.0) - bs.price_call(100.0, 366.0 / 365.0))
            / (2.0 / 365.0);
        assert!((theta - central).abs() > 1e-6);
        assert_eq!(process.valuation_date(), valuation_date());
    }

    // ========================================================================
    // Fill semantics
    // ========================================================================

    #[test]
    fn test_fill_leaves_engine_entries() {
        let snapshot = snapshot(100.0, 0.2, 0.05);
        let process = BlackScholesProcess::from_snapshot(&snapshot);
        let contract = vanilla(OptionType::Call, 100.0, ExerciseStyle::European, 365);
        let estimator =
            BumpEstimator::new(&AnalyticEuropeanEngine, &contract, &process, BumpSettings::default());

        let mut results = ResultSet::unavailable();
        results.set(Quantity::Npv, QuantityValue::Engine(10.450583572185565));
        results.set(Quantity::Delta, QuantityValue::Engine(0.5));
        estimator.fill(&mut results);

        assert_eq!(results.get(Quantity::Delta), QuantityValue::Engine(0.5));
        for q in [Quantity::Gamma, Quantity::Rho, Quantity::Vega, Quantity::Theta] {
            assert!(matches!(results.get(q), QuantityValue::Bumped(v) if v.is_finite()));
        }
    }

    #[test]
    fn test_failed_reprice_is_bumped_nan() {
        // Spot 100 sits 0.5% above the barrier; a 1% down bump touches it.
        let snapshot = snapshot(100.0, 0.2, 0.05);
        let process = BlackScholesProcess::from_snapshot(&snapshot);
        let contract = barrier(
            OptionType::Call,
            100.0,
            ExerciseStyle::European,
            365,
            BarrierType::DownOut,
            99.5,
            0.0,
        );
        let engine = crate::engines::AnalyticBarrierEngine;
        let estimator = BumpEstimator::new(&engine, &contract, &process, BumpSettings::default());

        let delta = estimator.first_order(snapshot.spot());
        assert!(delta.is_nan());
        assert_eq!(snapshot.spot().value(), 100.0);
    }

    #[test]
    fn test_zero_quote_gives_non_finite() {
        let snapshot = snapshot(100.0, 0.2, 0.0);
        let process = BlackScholesProcess::from_snapshot(&snapshot);
        let contract = vanilla(OptionType::Call, 100.0, ExerciseStyle::European, 365);
        let estimator =
            BumpEstimator::new(&AnalyticEuropeanEngine, &contract, &process, BumpSettings::default());

        let rho = estimator.first_order(snapshot.risk_free_rate());
        assert!(!rho.is_finite());
        assert_eq!(snapshot.risk_free_rate().value(), 0.0);
    }

    #[test]
    fn test_gamma_convex_for_long_puts() {
        let snapshot = snapshot(100.0, 0.2, 0.05);
        let process = BlackScholesProcess::from_snapshot(&snapshot);

        // In the money at 120, out of the money at 80.
        for strike in [120.0, 80.0] {
            let contract = vanilla(OptionType::Put, strike, ExerciseStyle::European, 365);
            let estimator = BumpEstimator::new(
                &AnalyticEuropeanEngine,
                &contract,
                &process,
                BumpSettings::default(),
            );
            let p0 = AnalyticEuropeanEngine.calculate(&contract, &process).unwrap().npv;
            let gamma = estimator.second_order(snapshot.spot(), p0);

            assert!(gamma > 0.0, "strike {strike}: gamma {gamma}");
            assert_relative_eq!(
                gamma,
                analytic_greeks(OptionType::Put, strike).gamma,
                max_relative = 1e-3
            );
        }
    }

    // ========================================================================
    // Properties
    // ========================================================================

    proptest! {
        #[test]
        fn prop_quotes_restored_bit_exact(
            spot in 50.0f64..150.0,
            vol in 0.05f64..0.6,
            rate in 0.001f64..0.1,
            strike in 60.0f64..140.0,
        ) {
            let snapshot = snapshot(spot, vol, rate);
            let process = BlackScholesProcess::from_snapshot(&snapshot);
            let contract = vanilla(OptionType::Put, strike, ExerciseStyle::European, 200);
            let estimator =
                BumpEstimator::new(&AnalyticEuropeanEngine, &contract, &process, BumpSettings::default());

            let mut results = ResultSet::unavailable();
            results.set(Quantity::Npv, QuantityValue::Engine(1.0));
            estimator.fill(&mut results);

            prop_assert_eq!(snapshot.spot().value().to_bits(), spot.to_bits());
            prop_assert_eq!(snapshot.volatility().value().to_bits(), vol.to_bits());
            prop_assert_eq!(snapshot.risk_free_rate().value().to_bits(), rate.to_bits());
        }

        #[test]
        fn prop_bumped_gamma_non_negative(
            strike in 60.0f64..140.0,
            is_call in any::<bool>(),
        ) {
            let option_type = if is_call { OptionType::Call } else { OptionType::Put };
            let snapshot = snapshot(100.0, 0.2, 0.05);
            let process = BlackScholesProcess::from_snapshot(&snapshot);
            let contract = vanilla(option_type, strike, ExerciseStyle::European, 365);
            let estimator =
                BumpEstimator::new(&AnalyticEuropeanEngine, &contract, &process, BumpSettings::default());
            let p0 = AnalyticEuropeanEngine.calculate(&contract, &process).unwrap().npv;

            prop_assert!(estimator.second_order(snapshot.spot(), p0) >= 0.0);
        }
    }
}
