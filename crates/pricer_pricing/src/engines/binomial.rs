//! Jarrow-Rudd binomial lattice.
//!
//! Equal-probability tree (`p = 1/2`) with
//! ```text
//! u = exp((r - q - sigma^2/2) dt + sigma sqrt(dt))
//! d = exp((r - q - sigma^2/2) dt - sigma sqrt(dt))
//! ```
//! Barriers are monitored on the nodes. A knock-in is rolled back alongside
//! a vanilla lattice and takes the vanilla value on every touched node.

use super::{
    ensure_barrier_alive, ensure_supported, expired_value, pde_theta, EngineResults,
    PricingEngine,
};
use crate::settings::BinomialSettings;
use pricer_core::types::PricingError;
use pricer_models::instruments::{Barrier, ContractShape, Exercise, OptionContract};
use pricer_models::models::BlackScholesProcess;

/// Binomial engine; supplies NPV, delta, gamma and theta for every shape.
///
/// Delta and gamma are read from the first two lattice layers; theta follows
/// from the Black-Scholes PDE. With zero volatility only the NPV is supplied.
#[derive(Debug, Clone, Copy)]
pub struct BinomialEngine {
    steps: usize,
}

impl Default for BinomialEngine {
    fn default() -> Self {
        Self::new(BinomialSettings::default())
    }
}

impl BinomialEngine {
    /// Engine with the given lattice size.
    pub fn new(settings: BinomialSettings) -> Self {
        Self {
            steps: settings.steps,
        }
    }

    /// Lattice steps.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }
}

/// Node spots of one lattice layer.
struct Lattice {
    spot: f64,
    up: f64,
    down: f64,
}

impl Lattice {
    fn layer(&self, i: usize, out: &mut Vec<f64>) {
        out.clear();
        let ratio = self.up / self.down;
        let mut s = self.spot * self.down.powi(i as i32);
        for _ in 0..=i {
            out.push(s);
            s *= ratio;
        }
    }
}

impl PricingEngine for BinomialEngine {
    fn name(&self) -> &'static str {
        "BinomialTree"
    }

    fn supports(&self, _shape: ContractShape) -> bool {
        true
    }

    fn calculate(
        &self,
        contract: &OptionContract,
        process: &BlackScholesProcess,
    ) -> Result<EngineResults, PricingError> {
        ensure_supported(self, contract)?;
        process.validate()?;

        let spot = process.spot();
        ensure_barrier_alive(contract, spot)?;

        let t = process.time_to(contract.maturity_date());
        if t <= 0.0 {
            return Ok(expired_value(contract, spot));
        }
        let n = self.steps;
        if n < 3 {
            return Err(PricingError::InvalidInput(format!(
                "binomial lattice needs at least 3 steps, got {}",
                n
            )));
        }

        let sigma = process.volatility();
        let dt = t / n as f64;
        let drift = process.log_drift() * dt;
        let diffusion = sigma * dt.sqrt();
        let lattice = Lattice {
            spot,
            up: (drift + diffusion).exp(),
            down: (drift - diffusion).exp(),
        };
        let step_discount = 0.5 * process.discount(dt)?;

        let exercise_from = match contract.exercise() {
            Exercise::American { earliest, .. } => Some(process.time_to(*earliest)),
            Exercise::European { .. } => None,
        };
        let payoff = *contract.payoff();
        let barrier: Option<Barrier> = contract.barrier().copied();
        let knock_in = barrier.map_or(false, |b| b.barrier_type.is_knock_in());
        let touched = |s: f64| barrier.map_or(false, |b| b.is_touched(s));

        let mut spots = Vec::with_capacity(n + 1);
        lattice.layer(n, &mut spots);

        // Vanilla layer; for a knock-in this is the lattice the holder
        // receives on touching.
        let mut vanilla: Vec<f64> = spots.iter().map(|s| payoff.value(*s)).collect();
        let mut values: Vec<f64> = match barrier {
            None => Vec::new(),
            Some(b) => spots
                .iter()
                .map(|s| match (touched(*s), knock_in) {
                    (true, true) => payoff.value(*s),
                    (true, false) => b.rebate,
                    (false, true) => b.rebate,
                    (false, false) => payoff.value(*s),
                })
                .collect(),
        };

        let mut layer_one = (Vec::new(), Vec::new());
        let mut layer_two = (Vec::new(), Vec::new());

        for i in (0..n).rev() {
            lattice.layer(i, &mut spots);
            let exercisable =
                exercise_from.map_or(false, |first| i as f64 * dt >= first - 1e-12);

            if barrier.is_none() || knock_in {
                for j in 0..=i {
                    let mut v = step_discount * (vanilla[j] + vanilla[j + 1]);
                    if exercisable {
                        v = v.max(payoff.value(spots[j]));
                    }
                    vanilla[j] = v;
                }
                vanilla.truncate(i + 1);
            }

            if let Some(b) = barrier {
                for j in 0..=i {
                    let s = spots[j];
                    values[j] = if touched(s) {
                        if knock_in {
                            vanilla[j]
                        } else {
                            b.rebate
                        }
                    } else {
                        let continuation = step_discount * (values[j] + values[j + 1]);
                        if exercisable && !knock_in {
                            continuation.max(payoff.value(s))
                        } else {
                            continuation
                        }
                    };
                }
                values.truncate(i + 1);
            }

            let current = if barrier.is_some() { &values } else { &vanilla };
            match i {
                1 => layer_one = (spots.clone(), current.clone()),
                2 => layer_two = (spots.clone(), current.clone()),
                _ => {}
            }
        }

        let npv = if barrier.is_some() { values[0] } else { vanilla[0] };
        // A zero-volatility lattice collapses to a single path.
        if sigma == 0.0 {
            return Ok(EngineResults::npv_only(npv));
        }
        let (s1, v1) = layer_one;
        let (s2, v2) = layer_two;
        let delta = (v1[1] - v1[0]) / (s1[1] - s1[0]);
        let delta_up = (v2[2] - v2[1]) / (s2[2] - s2[1]);
        let delta_down = (v2[1] - v2[0]) / (s2[1] - s2[0]);
        let gamma = (delta_up - delta_down) / (0.5 * (s2[2] - s2[0]));

        Ok(EngineResults {
            npv,
            delta: Some(delta),
            gamma: Some(gamma),
            theta: Some(pde_theta(process, npv, delta, gamma)),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use approx::assert_relative_eq;
    use pricer_models::instruments::{BarrierType, ExerciseStyle, OptionType};

    #[test]
    fn test_european_call_matches_black_scholes() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let contract = vanilla(OptionType::Call, 100.0, ExerciseStyle::European, 365);

        let r = BinomialEngine::default().calculate(&contract, &process).unwrap();
        assert_relative_eq!(r.npv, 10.450583572185565, epsilon = 5e-3);
        assert_relative_eq!(r.delta.unwrap(), 0.6368306511756191, epsilon = 1e-3);
        assert_relative_eq!(r.gamma.unwrap(), 0.018762017345846895, epsilon = 1e-4);
        assert_relative_eq!(r.theta.unwrap(), -6.414027546438197, epsilon = 2e-2);
    }

    #[test]
    fn test_put_and_american_put() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let engine = BinomialEngine::default();

        let european = engine
            .calculate(&vanilla(OptionType::Put, 100.0, ExerciseStyle::European, 365), &process)
            .unwrap();
        let american = engine
            .calculate(&vanilla(OptionType::Put, 100.0, ExerciseStyle::American, 365), &process)
            .unwrap();

        assert_relative_eq!(european.npv, 5.573526022256971, epsilon = 5e-3);
        assert_relative_eq!(american.npv, 6.0916, epsilon = 5e-3);
        assert!(american.npv > european.npv);
    }

    #[test]
    fn test_knock_in_plus_knock_out_is_vanilla() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let engine = BinomialEngine::new(BinomialSettings { steps: 300 });
        let vanilla_npv = engine
            .calculate(&vanilla(OptionType::Call, 100.0, ExerciseStyle::European, 365), &process)
            .unwrap()
            .npv;

        for (out_type, in_type, level) in [
            (BarrierType::DownOut, BarrierType::DownIn, 85.0),
            (BarrierType::UpOut, BarrierType::UpIn, 125.0),
        ] {
            let out = engine
                .calculate(
                    &barrier(OptionType::Call, 100.0, ExerciseStyle::European, 365, out_type, level, 0.0),
                    &process,
                )
                .unwrap()
                .npv;
            let inn = engine
                .calculate(
                    &barrier(OptionType::Call, 100.0, ExerciseStyle::European, 365, in_type, level, 0.0),
                    &process,
                )
                .unwrap()
                .npv;
            assert_relative_eq!(out + inn, vanilla_npv, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_far_barrier_close_to_closed_form() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let contract = barrier(OptionType::Call, 90.0, ExerciseStyle::European, 365, BarrierType::DownOut, 80.0, 0.0);
        let r = BinomialEngine::default().calculate(&contract, &process).unwrap();
        assert_relative_eq!(r.npv, 16.3567, epsilon = 0.1);
    }

    #[test]
    fn test_layer_spots() {
        let lattice = Lattice {
            spot: 100.0,
            up: 1.1,
            down: 0.9,
        };
        let mut out = Vec::new();
        lattice.layer(2, &mut out);
        assert_eq!(out.len(), 3);
        assert_relative_eq!(out[0], 81.0, epsilon = 1e-10);
        assert_relative_eq!(out[1], 99.0, epsilon = 1e-10);
        assert_relative_eq!(out[2], 121.0, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_volatility_supplies_npv_only() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.0, 0.05));
        let forward_intrinsic = 100.0 - 100.0 * (-0.05_f64).exp();

        let call = vanilla(OptionType::Call, 100.0, ExerciseStyle::European, 365);
        let r = BinomialEngine::default().calculate(&call, &process).unwrap();
        assert_relative_eq!(r.npv, forward_intrinsic, epsilon = 1e-9);
        assert!(r.delta.is_none() && r.gamma.is_none() && r.theta.is_none());

        let put = vanilla(OptionType::Put, 100.0, ExerciseStyle::European, 365);
        let r = BinomialEngine::default().calculate(&put, &process).unwrap();
        assert_relative_eq!(r.npv, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_too_few_steps_rejected() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let contract = vanilla(OptionType::Call, 100.0, ExerciseStyle::European, 365);
        assert!(BinomialEngine::new(BinomialSettings { steps: 2 })
            .calculate(&contract, &process)
            .is_err());
    }
}
