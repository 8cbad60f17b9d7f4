//! Closed-form engine for European single-barrier options with rebate.

use super::{ensure_barrier_alive, ensure_supported, expired_value, EngineResults, PricingEngine};
use pricer_core::types::PricingError;
use pricer_models::analytical::BarrierAnalytic;
use pricer_models::instruments::{ContractShape, ExerciseStyle, OptionContract};
use pricer_models::models::BlackScholesProcess;

/// Reiner-Rubinstein barrier engine; supplies NPV only.
///
/// A knock-out rebate is paid when the barrier is hit, a knock-in rebate at
/// expiry if the barrier was never hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticBarrierEngine;

impl PricingEngine for AnalyticBarrierEngine {
    fn name(&self) -> &'static str {
        "AnalyticalBinary"
    }

    fn supports(&self, shape: ContractShape) -> bool {
        shape.has_barrier && shape.exercise_style == ExerciseStyle::European
    }

    fn calculate(
        &self,
        contract: &OptionContract,
        process: &BlackScholesProcess,
    ) -> Result<EngineResults, PricingError> {
        ensure_supported(self, contract)?;
        process.validate()?;

        let barrier = contract.barrier().ok_or_else(|| {
            PricingError::UnsupportedInstrument("barrier engine needs barrier terms".to_string())
        })?;
        let spot = process.spot();
        ensure_barrier_alive(contract, spot)?;

        let t = process.time_to(contract.maturity_date());
        if t <= 0.0 {
            return Ok(expired_value(contract, spot));
        }

        let npv = BarrierAnalytic::new(process.black_scholes()?).price(
            contract.option_type(),
            barrier.barrier_type,
            barrier.level,
            barrier.rebate,
            contract.strike(),
            t,
        )?;
        Ok(EngineResults::npv_only(npv))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use approx::assert_relative_eq;
    use pricer_models::instruments::{BarrierType, OptionType};

    fn price(option_type: OptionType, strike: f64, barrier_type: BarrierType, level: f64) -> f64 {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let contract = barrier(
            option_type,
            strike,
            ExerciseStyle::European,
            365,
            barrier_type,
            level,
            0.0,
        );
        AnalyticBarrierEngine.calculate(&contract, &process).unwrap().npv
    }

    #[test]
    fn test_preset_values() {
        assert_relative_eq!(price(OptionType::Call, 90.0, BarrierType::DownOut, 80.0), 16.3567, epsilon = 1e-4);
        assert_relative_eq!(price(OptionType::Call, 80.0, BarrierType::DownIn, 90.0), 7.5287, epsilon = 1e-4);
        assert_relative_eq!(price(OptionType::Call, 110.0, BarrierType::UpOut, 120.0), 0.1516, epsilon = 1e-4);
        assert_relative_eq!(price(OptionType::Call, 120.0, BarrierType::UpIn, 130.0), 3.1200, epsilon = 1e-4);
    }

    #[test]
    fn test_npv_only() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let contract = barrier(
            OptionType::Put,
            100.0,
            ExerciseStyle::European,
            180,
            BarrierType::UpOut,
            120.0,
            1.0,
        );
        let r = AnalyticBarrierEngine.calculate(&contract, &process).unwrap();
        assert!(r.npv > 0.0);
        assert!(r.delta.is_none() && r.vega.is_none() && r.theta.is_none());
    }

    #[test]
    fn test_touched_barrier_fails() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let contract = barrier(
            OptionType::Call,
            100.0,
            ExerciseStyle::European,
            365,
            BarrierType::UpIn,
            95.0,
            0.0,
        );
        assert!(matches!(
            AnalyticBarrierEngine.calculate(&contract, &process),
            Err(PricingError::BarrierTouched { .. })
        ));
    }

    #[test]
    fn test_rejects_vanilla_and_american() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let contract = vanilla(OptionType::Call, 100.0, ExerciseStyle::European, 365);
        assert!(matches!(
            AnalyticBarrierEngine.calculate(&contract, &process),
            Err(PricingError::UnsupportedInstrument(_))
        ));

        let american = barrier(
            OptionType::Call,
            100.0,
            ExerciseStyle::American,
            365,
            BarrierType::DownOut,
            80.0,
            0.0,
        );
        assert!(!AnalyticBarrierEngine.supports(american.shape()));
    }
}
