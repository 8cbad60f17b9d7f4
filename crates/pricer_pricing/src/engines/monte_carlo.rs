//! Pseudorandom Monte Carlo engine for European vanillas and barriers.
//!
//! # Sampling
//!
//! Paths are simulated with the exact log-normal step
//! ```text
//! ln S(t+dt) = ln S(t) + (r - q - sigma^2/2) dt + sigma sqrt(dt) Z
//! ```
//! Samples are drawn in batches until the standard error of the discounted
//! mean falls below the required tolerance:
//!
//! 1. Draw `min_samples` paths.
//! 2. While the error exceeds the tolerance, draw
//!    `max(n * (err/tol)^2 * 0.8 - n, min_samples)` more, capped by `max_samples`.
//! 3. Fail if the cap is reached first.
//!
//! # Barrier monitoring
//!
//! Between two monitoring points the log-spot is a Brownian bridge, so the
//! probability that it crossed the barrier `h = ln H` is
//! ```text
//! p = exp(-2 (x_i - h)(x_{i+1} - h) / (sigma^2 dt))
//! ```
//! Each path is weighted by its survival probability rather than killed,
//! which keeps a single time step unbiased for continuous monitoring.
//!
//! # Rebates
//!
//! A knock-in rebate is paid at expiry when the barrier was never hit. A
//! knock-out rebate is paid at the first hit: every step adds the
//! closed-form value of a rebate paid on a hit within that step, started
//! from the step's spot and weighted by the survival so far. Without the
//! bridge the rebate is paid on the first monitoring date beyond the barrier.

use super::{ensure_barrier_alive, ensure_supported, expired_value, EngineResults, PricingEngine};
use crate::rng::PricerRng;
use crate::settings::MonteCarloSettings;
use pricer_core::types::PricingError;
use pricer_models::analytical::HitRebate;
use pricer_models::instruments::{Barrier, ContractShape, ExerciseStyle, OptionContract};
use pricer_models::models::BlackScholesProcess;
use tracing::debug;

/// Monte Carlo engine; supplies NPV with its error estimate.
///
/// Results are deterministic for a given seed and market.
#[derive(Debug, Clone, Default)]
pub struct MonteCarloEngine {
    settings: MonteCarloSettings,
}

impl MonteCarloEngine {
    /// Engine with the given sampling parameters.
    pub fn new(settings: MonteCarloSettings) -> Self {
        Self { settings }
    }

    /// Sampling parameters.
    #[inline]
    pub fn settings(&self) -> &MonteCarloSettings {
        &self.settings
    }
}

impl PricingEngine for MonteCarloEngine {
    fn name(&self) -> &'static str {
        "MonteCarlo"
    }

    fn supports(&self, shape: ContractShape) -> bool {
        shape.exercise_style == ExerciseStyle::European
    }

    fn calculate(
        &self,
        contract: &OptionContract,
        process: &BlackScholesProcess,
    ) -> Result<EngineResults, PricingError> {
        ensure_supported(self, contract)?;
        process.validate()?;
        self.settings
            .validate()
            .map_err(|e| PricingError::InvalidInput(e.to_string()))?;

        let spot = process.spot();
        ensure_barrier_alive(contract, spot)?;

        let t = process.time_to(contract.maturity_date());
        if t <= 0.0 {
            return Ok(expired_value(contract, spot));
        }

        let discount = process.discount(t)?;
        let sampler = PathSampler::new(contract, process, t, &self.settings)?;
        let mut rng = PricerRng::from_seed(self.settings.seed());
        let mut stats = Statistics::default();

        let tolerance = self.settings.required_tolerance();
        let min_samples = self.settings.min_samples();
        let max_samples = self.settings.max_samples();

        sampler.add_samples(&mut rng, &mut stats, min_samples);
        loop {
            let error = discount * stats.error_estimate();
            if error <= tolerance {
                break;
            }
            if stats.count >= max_samples {
                return Err(PricingError::NumericalInstability(format!(
                    "max number of samples ({}) reached while error {:.6} is above tolerance {}",
                    max_samples, error, tolerance
                )));
            }
            let n = stats.count as f64;
            let order = (error * error) / (tolerance * tolerance);
            let next = ((n * order * 0.8 - n).max(min_samples as f64)) as usize;
            let next = next.min(max_samples - stats.count);
            sampler.add_samples(&mut rng, &mut stats, next);
        }

        debug!(
            samples = stats.count,
            seed = rng.seed(),
            "Monte Carlo converged"
        );

        Ok(EngineResults {
            npv: discount * stats.mean(),
            error_estimate: Some(discount * stats.error_estimate()),
            ..Default::default()
        })
    }
}

/// Running sample moments.
#[derive(Debug, Default, Clone, Copy)]
struct Statistics {
    count: usize,
    sum: f64,
    sum_sq: f64,
}

impl Statistics {
    #[inline]
    fn add(&mut self, x: f64) {
        self.count += 1;
        self.sum += x;
        self.sum_sq += x * x;
    }

    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }

    /// Standard error of the mean.
    fn error_estimate(&self) -> f64 {
        if self.count < 2 {
            return f64::INFINITY;
        }
        let n = self.count as f64;
        let mean = self.mean();
        let variance = ((self.sum_sq / n - mean * mean) * n / (n - 1.0)).max(0.0);
        (variance / n).sqrt()
    }
}

/// Undiscounted path payoff generator.
struct PathSampler<'a> {
    contract: &'a OptionContract,
    barrier: Option<Barrier>,
    /// Knock-out rebate paid within a step, when monitored continuously.
    rebate_leg: Option<HitRebate<f64>>,
    /// `exp(r (T - t_i))` for every monitoring date `t_i`.
    carry: Vec<f64>,
    x0: f64,
    log_barrier: f64,
    drift: f64,
    diffusion: f64,
    bridge_scale: f64,
    dt: f64,
    steps: usize,
    brownian_bridge: bool,
}

impl<'a> PathSampler<'a> {
    fn new(
        contract: &'a OptionContract,
        process: &BlackScholesProcess,
        t: f64,
        settings: &MonteCarloSettings,
    ) -> Result<Self, PricingError> {
        let steps = settings.time_steps();
        let dt = t / steps as f64;
        let sigma = process.volatility();
        let r = process.rate();
        let barrier = contract.barrier().copied();

        let rebate_leg = match barrier {
            Some(b)
                if settings.brownian_bridge()
                    && !b.barrier_type.is_knock_in()
                    && b.rebate != 0.0 =>
            {
                Some(HitRebate::new(&process.black_scholes()?, b.barrier_type))
            }
            _ => None,
        };
        let carry = (0..=steps)
            .map(|i| (r * (t - i as f64 * dt)).exp())
            .collect();

        Ok(Self {
            contract,
            barrier,
            rebate_leg,
            carry,
            x0: process.spot().ln(),
            log_barrier: barrier.map_or(0.0, |b| b.level.ln()),
            drift: process.log_drift() * dt,
            diffusion: sigma * dt.sqrt(),
            bridge_scale: -2.0 / (sigma * sigma * dt),
            dt,
            steps,
            brownian_bridge: settings.brownian_bridge(),
        })
    }

    fn add_samples(&self, rng: &mut PricerRng, stats: &mut Statistics, count: usize) {
        for _ in 0..count {
            stats.add(self.sample(rng));
        }
    }

    /// Path value in expiry units; the caller discounts it to today.
    fn sample(&self, rng: &mut PricerRng) -> f64 {
        let mut x = self.x0;
        let mut survival = 1.0;
        let mut rebate_paid = 0.0;

        for step in 0..self.steps {
            let next = x + self.drift + self.diffusion * rng.gen_normal();
            if let Some(b) = &self.barrier {
                if survival > 0.0 {
                    if let Some(leg) = &self.rebate_leg {
                        rebate_paid += survival
                            * leg.value(x.exp(), b.level, b.rebate, self.dt)
                            * self.carry[step];
                    }
                    if b.is_touched(next.exp()) {
                        if self.rebate_leg.is_none() {
                            rebate_paid += survival * b.rebate * self.carry[step + 1];
                        }
                        survival = 0.0;
                    } else if self.brownian_bridge {
                        let cross = (self.bridge_scale
                            * (x - self.log_barrier)
                            * (next - self.log_barrier))
                            .exp();
                        survival *= 1.0 - cross;
                    }
                }
            }
            x = next;
        }

        let payoff = self.contract.payoff().value(x.exp());
        match &self.barrier {
            None => payoff,
            Some(b) if b.barrier_type.is_knock_in() => {
                payoff * (1.0 - survival) + b.rebate * survival
            }
            Some(_) => payoff * survival + rebate_paid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use pricer_models::instruments::{BarrierType, OptionType};

    fn fast_settings() -> MonteCarloSettings {
        MonteCarloSettings::builder()
            .required_tolerance(0.05)
            .build()
            .unwrap()
    }

    #[test]
    fn test_call_within_tolerance_of_black_scholes() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let contract = vanilla(OptionType::Call, 100.0, ExerciseStyle::European, 365);

        let r = MonteCarloEngine::new(fast_settings())
            .calculate(&contract, &process)
            .unwrap();
        let err = r.error_estimate.unwrap();
        assert!(err <= 0.05);
        assert!((r.npv - 10.450583572185565).abs() < 5.0 * err);
        assert!(r.delta.is_none() && r.gamma.is_none());
    }

    #[test]
    fn test_deterministic_for_same_seed() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let contract = vanilla(OptionType::Put, 95.0, ExerciseStyle::European, 180);
        let engine = MonteCarloEngine::new(fast_settings());

        let a = engine.calculate(&contract, &process).unwrap();
        let b = engine.calculate(&contract, &process).unwrap();
        assert_eq!(a.npv.to_bits(), b.npv.to_bits());
        assert_eq!(a.error_estimate, b.error_estimate);
    }

    #[test]
    fn test_barrier_within_tolerance_of_closed_form() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let engine = MonteCarloEngine::new(fast_settings());

        for (strike, barrier_type, level, expected) in [
            (90.0, BarrierType::DownOut, 80.0, 16.3567),
            (80.0, BarrierType::DownIn, 90.0, 7.5287),
            (120.0, BarrierType::UpIn, 130.0, 3.1200),
        ] {
            let contract = barrier(
                OptionType::Call,
                strike,
                ExerciseStyle::European,
                365,
                barrier_type,
                level,
                0.0,
            );
            let r = engine.calculate(&contract, &process).unwrap();
            let err = r.error_estimate.unwrap();
            assert!(
                (r.npv - expected).abs() < 5.0 * err.max(0.01),
                "{barrier_type}: {} vs {expected}",
                r.npv
            );
        }
    }

    #[test]
    fn test_knock_out_rebate_paid_at_hit() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let engine = MonteCarloEngine::default();

        for (barrier_type, level, rebate) in [
            (BarrierType::DownOut, 95.0, 10.0),
            (BarrierType::UpOut, 120.0, 5.0),
        ] {
            let contract = barrier(
                OptionType::Call,
                100.0,
                ExerciseStyle::European,
                365,
                barrier_type,
                level,
                rebate,
            );
            let exact = crate::engines::AnalyticBarrierEngine
                .calculate(&contract, &process)
                .unwrap()
                .npv;
            let r = engine.calculate(&contract, &process).unwrap();
            let err = r.error_estimate.unwrap();
            assert!(
                (r.npv - exact).abs() < 4.0 * err,
                "{barrier_type}: {} vs {exact} (err {err})",
                r.npv
            );
        }
    }

    #[test]
    fn test_zero_volatility_is_deterministic() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.0, 0.05));
        let contract = vanilla(OptionType::Call, 100.0, ExerciseStyle::European, 365);

        let r = MonteCarloEngine::default().calculate(&contract, &process).unwrap();
        assert!((r.npv - (100.0 - 100.0 * (-0.05_f64).exp())).abs() < 1e-9);
        assert!(r.error_estimate.unwrap() < 1e-6);
    }

    #[test]
    fn test_max_samples_reached_fails() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let contract = vanilla(OptionType::Call, 100.0, ExerciseStyle::European, 365);
        let settings = MonteCarloSettings::builder()
            .required_tolerance(1e-4)
            .min_samples(100)
            .max_samples(1000)
            .build()
            .unwrap();

        assert!(matches!(
            MonteCarloEngine::new(settings).calculate(&contract, &process),
            Err(PricingError::NumericalInstability(_))
        ));
    }

    #[test]
    fn test_rejects_american() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let contract = vanilla(OptionType::Put, 100.0, ExerciseStyle::American, 365);
        assert!(matches!(
            MonteCarloEngine::default().calculate(&contract, &process),
            Err(PricingError::UnsupportedInstrument(_))
        ));
    }

    #[test]
    fn test_statistics() {
        let mut stats = Statistics::default();
        assert!(stats.error_estimate().is_infinite());
        for x in [1.0, 2.0, 3.0, 4.0] {
            stats.add(x);
        }
        assert_eq!(stats.mean(), 2.5);
        let expected = (1.6666666666666667_f64 / 4.0).sqrt();
        assert!((stats.error_estimate() - expected).abs() < 1e-12);
    }
}
