//! Crank-Nicolson finite-difference engine in log-spot.
//!
//! The Black-Scholes PDE in `x = ln S` and time to maturity `tau`,
//! ```text
//! dV/dtau = 0.5*sigma^2 * V_xx + (r - q - 0.5*sigma^2) * V_x - r*V
//! ```
//! is stepped from maturity back to valuation on a uniform grid. The first
//! steps are fully implicit (Rannacher start) to damp the payoff kink.
//!
//! ## Grid
//!
//! - Spot always lies on a node, so NPV, delta and gamma need no interpolation.
//! - A barrier also lies on a node. Knock-outs solve on the alive side only
//!   with the rebate as boundary value.
//! - Knock-ins are solved in lockstep with a vanilla grid spanning both
//!   sides of the barrier; the vanilla value on the barrier node is the
//!   knock-in boundary.
//!
//! Theta follows from the PDE once value, delta and gamma are known.

use super::{
    ensure_barrier_alive, ensure_supported, expired_value, pde_theta, EngineResults,
    PricingEngine,
};
use crate::settings::FiniteDifferenceSettings;
use pricer_core::types::PricingError;
use pricer_models::instruments::{
    Barrier, ContractShape, Exercise, OptionContract, OptionType, PlainVanillaPayoff,
};
use pricer_models::models::BlackScholesProcess;

/// Fully implicit steps at the start of the roll-back.
const DAMPING_STEPS: usize = 2;

/// Half-width of the grid in standard deviations of `ln S_T`.
const STD_DEVS: f64 = 5.0;

/// Finite-difference engine; supplies NPV, delta, gamma and theta for every
/// contract shape. The grid is sized by the volatility, so zero volatility
/// is rejected.
#[derive(Debug, Clone, Copy)]
pub struct FdBlackScholesEngine {
    time_steps: usize,
    grid_points: usize,
}

impl Default for FdBlackScholesEngine {
    fn default() -> Self {
        Self::new(FiniteDifferenceSettings::default())
    }
}

impl FdBlackScholesEngine {
    /// Engine with the given grid size.
    pub fn new(settings: FiniteDifferenceSettings) -> Self {
        Self {
            time_steps: settings.time_steps,
            grid_points: settings.grid_points,
        }
    }

    /// Time steps.
    #[inline]
    pub fn time_steps(&self) -> usize {
        self.time_steps
    }

    /// Spatial nodes.
    #[inline]
    pub fn grid_points(&self) -> usize {
        self.grid_points
    }
}

impl PricingEngine for FdBlackScholesEngine {
    fn name(&self) -> &'static str {
        "FiniteDifferenceGrid"
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
        if self.time_steps == 0 || self.grid_points < 5 {
            return Err(PricingError::InvalidInput(format!(
                "finite-difference grid {}x{} is too small",
                self.time_steps, self.grid_points
            )));
        }

        let sigma = process.volatility();
        if sigma <= 0.0 {
            return Err(PricingError::InvalidInput(
                "finite-difference grid needs a positive volatility".to_string(),
            ));
        }
        let r = process.rate();
        let q = process.dividend_yield();
        let strike = contract.strike();
        let barrier = contract.barrier().copied();

        let grid = LogGrid::build(
            self.grid_points,
            spot,
            strike,
            sigma * t.sqrt(),
            barrier.as_ref(),
        )?;
        let op = Operator::new(sigma, r, q, grid.dx);
        let payoff = *contract.payoff();
        let terminal: Vec<f64> = grid.spots.iter().map(|s| payoff.value(*s)).collect();

        // Exercise is allowed once time to maturity drops to this level.
        let exercise_limit = match contract.exercise() {
            Exercise::American { earliest, .. } => Some(t - process.time_to(*earliest)),
            Exercise::European { .. } => None,
        };
        let far = FarBoundary { payoff, r, q };

        let n = self.grid_points;
        let (s_low, s_high) = (grid.spots[0], grid.spots[n - 1]);
        let needs_vanilla = barrier.map_or(true, |b| b.barrier_type.is_knock_in());

        let mut vanilla = terminal.clone();
        let mut barrier_values = match (barrier, grid.barrier_index) {
            (Some(b), Some(ib)) => {
                let mut values = if b.barrier_type.is_knock_in() {
                    vec![b.rebate; n]
                } else {
                    terminal.clone()
                };
                values[ib] = if b.barrier_type.is_knock_in() {
                    terminal[ib]
                } else {
                    b.rebate
                };
                Some(values)
            }
            _ => None,
        };

        let dt = t / self.time_steps as f64;
        let mut work = Tridiagonal::new(n);

        for step in 0..self.time_steps {
            let tau = (step + 1) as f64 * dt;
            let theta = if step < DAMPING_STEPS { 1.0 } else { 0.5 };
            let exercisable = exercise_limit.map_or(false, |limit| tau <= limit + 1e-12);

            if needs_vanilla {
                let lower = far.value(tau, s_low, exercisable);
                let upper = far.value(tau, s_high, exercisable);
                work.theta_step(&mut vanilla, &op, theta, dt, lower, upper);
                if exercisable {
                    apply_exercise(&mut vanilla, &terminal);
                }
            }

            if let (Some(b), Some(values), Some(ib)) =
                (barrier.as_ref(), barrier_values.as_mut(), grid.barrier_index)
            {
                let down = b.barrier_type.is_down();
                if b.barrier_type.is_knock_in() {
                    let knocked = vanilla[ib];
                    let untouched = b.rebate * (-r * tau).exp();
                    if down {
                        work.theta_step(&mut values[ib..], &op, theta, dt, knocked, untouched);
                    } else {
                        work.theta_step(&mut values[..=ib], &op, theta, dt, untouched, knocked);
                    }
                } else if down {
                    let upper = far.value(tau, s_high, exercisable);
                    work.theta_step(&mut values[ib..], &op, theta, dt, b.rebate, upper);
                    if exercisable {
                        apply_exercise(&mut values[ib + 1..], &terminal[ib + 1..]);
                    }
                } else {
                    let lower = far.value(tau, s_low, exercisable);
                    work.theta_step(&mut values[..=ib], &op, theta, dt, lower, b.rebate);
                    if exercisable {
                        apply_exercise(&mut values[..ib], &terminal[..ib]);
                    }
                }
            }
        }

        let values = barrier_values.unwrap_or(vanilla);
        let i = grid.spot_index;
        let npv = values[i];
        let v_x = (values[i + 1] - values[i - 1]) / (2.0 * grid.dx);
        let v_xx = (values[i + 1] - 2.0 * values[i] + values[i - 1]) / (grid.dx * grid.dx);
        let delta = v_x / spot;
        let gamma = (v_xx - v_x) / (spot * spot);

        if !(npv.is_finite() && delta.is_finite() && gamma.is_finite()) {
            return Err(PricingError::NumericalInstability(
                "finite-difference solution is not finite".to_string(),
            ));
        }

        Ok(EngineResults {
            npv,
            delta: Some(delta),
            gamma: Some(gamma),
            theta: Some(pde_theta(process, npv, delta, gamma)),
            ..Default::default()
        })
    }
}

/// Uniform grid in log-spot with spot, and the barrier when present, on nodes.
#[derive(Debug)]
struct LogGrid {
    spots: Vec<f64>,
    dx: f64,
    spot_index: usize,
    barrier_index: Option<usize>,
}

impl LogGrid {
    fn build(
        n: usize,
        spot: f64,
        strike: f64,
        std_dev: f64,
        barrier: Option<&Barrier>,
    ) -> Result<Self, PricingError> {
        let x0 = spot.ln();
        let width = STD_DEVS * std_dev + (strike / spot).ln().abs();
        let last = n - 1;

        let (x_min, dx, spot_index, barrier_index) = match barrier {
            None => {
                let dx = 2.0 * width / last as f64;
                let i0 = last / 2;
                (x0 - i0 as f64 * dx, dx, i0, None)
            }
            Some(b) => {
                let xb = b.level.ln();
                let distance = (x0 - xb).abs();
                let knock_in = b.barrier_type.is_knock_in();
                let span = if knock_in {
                    distance + 2.0 * width
                } else {
                    distance + width
                };
                let coarse = span / last as f64;
                let m = ((distance / coarse).round() as usize).clamp(1, last - 2);
                let dx = distance / m as f64;
                // Nodes on the knocked side of the barrier, used by the vanilla grid.
                let beyond = if knock_in {
                    ((width / dx).round() as usize).min((last - m) / 2)
                } else {
                    0
                };
                if b.barrier_type.is_down() {
                    (xb - beyond as f64 * dx, dx, beyond + m, Some(beyond))
                } else {
                    let i0 = last - beyond - m;
                    (x0 - i0 as f64 * dx, dx, i0, Some(i0 + m))
                }
            }
        };

        if !(dx.is_finite() && dx > 0.0) || spot_index == 0 || spot_index >= last {
            return Err(PricingError::NumericalInstability(format!(
                "cannot place spot {} on a {}-node grid",
                spot, n
            )));
        }

        let spots = (0..n).map(|i| (x_min + i as f64 * dx).exp()).collect();
        Ok(Self {
            spots,
            dx,
            spot_index,
            barrier_index,
        })
    }
}

/// Asymptotic value at the far edges of the grid.
struct FarBoundary {
    payoff: PlainVanillaPayoff,
    r: f64,
    q: f64,
}

impl FarBoundary {
    fn value(&self, tau: f64, spot: f64, exercisable: bool) -> f64 {
        let strike = self.payoff.strike();
        let forward_spot = spot * (-self.q * tau).exp();
        let discounted_strike = strike * (-self.r * tau).exp();
        let european = match self.payoff.option_type() {
            OptionType::Call => forward_spot - discounted_strike,
            OptionType::Put => discounted_strike - forward_spot,
        }
        .max(0.0);
        if exercisable {
            european.max(self.payoff.value(spot))
        } else {
            european
        }
    }
}

/// Three-point discretisation of the log-space operator.
#[derive(Debug, Clone, Copy)]
struct Operator {
    lower: f64,
    centre: f64,
    upper: f64,
}

impl Operator {
    fn new(sigma: f64, r: f64, q: f64, dx: f64) -> Self {
        let diffusion = 0.5 * sigma * sigma / (dx * dx);
        let convection = (r - q - 0.5 * sigma * sigma) / (2.0 * dx);
        Self {
            lower: diffusion - convection,
            centre: -2.0 * diffusion - r,
            upper: diffusion + convection,
        }
    }
}

/// Scratch space for the Thomas algorithm.
struct Tridiagonal {
    rhs: Vec<f64>,
    c_prime: Vec<f64>,
}

impl Tridiagonal {
    fn new(n: usize) -> Self {
        Self {
            rhs: vec![0.0; n],
            c_prime: vec![0.0; n],
        }
    }

    /// One theta-scheme step on `values`, whose end nodes are Dirichlet
    /// boundaries set to `lower` and `upper` after the step.
    fn theta_step(
        &mut self,
        values: &mut [f64],
        op: &Operator,
        theta: f64,
        dt: f64,
        lower: f64,
        upper: f64,
    ) {
        let n = values.len();
        if n < 3 {
            values[0] = lower;
            values[n - 1] = upper;
            return;
        }
        let m = n - 2;

        let a = -theta * dt * op.lower;
        let b = 1.0 - theta * dt * op.centre;
        let c = -theta * dt * op.upper;
        let explicit = (1.0 - theta) * dt;

        let rhs = &mut self.rhs[..m];
        let c_prime = &mut self.c_prime[..m];
        for i in 0..m {
            rhs[i] = values[i + 1]
                + explicit
                    * (op.lower * values[i] + op.centre * values[i + 1] + op.upper * values[i + 2]);
        }
        rhs[0] -= a * lower;
        rhs[m - 1] -= c * upper;

        c_prime[0] = c / b;
        rhs[0] /= b;
        for i in 1..m {
            let denom = b - a * c_prime[i - 1];
            c_prime[i] = c / denom;
            rhs[i] = (rhs[i] - a * rhs[i - 1]) / denom;
        }

        values[m] = rhs[m - 1];
        for i in (0..m - 1).rev() {
            values[i + 1] = rhs[i] - c_prime[i] * values[i + 2];
        }
        values[0] = lower;
        values[n - 1] = upper;
    }
}

#[inline]
fn apply_exercise(values: &mut [f64], intrinsic: &[f64]) {
    for (v, e) in values.iter_mut().zip(intrinsic) {
        *v = v.max(*e);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::market_data::MarketSnapshot;
    use pricer_models::analytical::{BarrierAnalytic, BlackScholes};
    use pricer_models::instruments::{BarrierType, ExerciseStyle};

    // ========================================================================
    // Vanilla
    // ========================================================================

    #[test]
    fn test_european_call_matches_black_scholes() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let contract = vanilla(OptionType::Call, 100.0, ExerciseStyle::European, 365);

        let r = FdBlackScholesEngine::default().calculate(&contract, &process).unwrap();
        assert_relative_eq!(r.npv, 10.450583572185565, epsilon = 1e-3);
        assert_relative_eq!(r.delta.unwrap(), 0.6368306511756191, epsilon = 1e-3);
        assert_relative_eq!(r.gamma.unwrap(), 0.018762017345846895, epsilon = 1e-4);
        assert_relative_eq!(r.theta.unwrap(), -6.414027546438197, epsilon = 1e-2);
        assert!(r.vega.is_none() && r.rho.is_none());
    }

    #[test]
    fn test_european_put_matches_black_scholes() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let contract = vanilla(OptionType::Put, 100.0, ExerciseStyle::European, 365);

        let r = FdBlackScholesEngine::default().calculate(&contract, &process).unwrap();
        assert_relative_eq!(r.npv, 5.573526022256971, epsilon = 1e-3);
    }

    #[test]
    fn test_off_the_money_strike() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.3, 0.03));
        let contract = vanilla(OptionType::Call, 130.0, ExerciseStyle::European, 182);
        let t = 182.0 / 365.0;
        let expected = BlackScholes::new(100.0, 0.03, 0.3).unwrap().price_call(130.0, t);

        let r = FdBlackScholesEngine::default().calculate(&contract, &process).unwrap();
        assert_relative_eq!(r.npv, expected, epsilon = 2e-3);
    }

    #[test]
    fn test_american_put_exceeds_european() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let engine = FdBlackScholesEngine::default();
        let european = engine
            .calculate(&vanilla(OptionType::Put, 100.0, ExerciseStyle::European, 365), &process)
            .unwrap();
        let american = engine
            .calculate(&vanilla(OptionType::Put, 100.0, ExerciseStyle::American, 365), &process)
            .unwrap();

        assert!(american.npv > european.npv + 0.3);
        assert_relative_eq!(american.npv, 6.0896, epsilon = 5e-3);
    }

    #[test]
    fn test_american_call_without_dividend_is_european() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let r = FdBlackScholesEngine::default()
            .calculate(&vanilla(OptionType::Call, 100.0, ExerciseStyle::American, 365), &process)
            .unwrap();
        assert_relative_eq!(r.npv, 10.450583572185565, epsilon = 2e-3);
    }

    // ========================================================================
    // Barrier
    // ========================================================================

    fn haug_snapshot() -> MarketSnapshot {
        snapshot(100.0, 0.25, 0.08).with_dividend_yield(0.04)
    }

    #[test]
    fn test_knock_out_and_knock_in_with_rebate() {
        let snapshot = haug_snapshot();
        let process = BlackScholesProcess::from_snapshot(&snapshot);
        let t = process.time_to(valuation_date().add_days(183).unwrap());
        let closed_form = BarrierAnalytic::new(process.black_scholes().unwrap());
        let engine = FdBlackScholesEngine::default();

        for barrier_type in [BarrierType::DownOut, BarrierType::DownIn] {
            let contract = barrier(
                OptionType::Call,
                100.0,
                ExerciseStyle::European,
                183,
                barrier_type,
                95.0,
                3.0,
            );
            let expected = closed_form
                .price(OptionType::Call, barrier_type, 95.0, 3.0, 100.0, t)
                .unwrap();
            let r = engine.calculate(&contract, &process).unwrap();
            assert_relative_eq!(r.npv, expected, epsilon = 2e-3);
        }
    }

    #[test]
    fn test_up_barriers_match_closed_form() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let engine = FdBlackScholesEngine::default();

        let up_out = barrier(OptionType::Call, 110.0, ExerciseStyle::European, 365, BarrierType::UpOut, 120.0, 0.0);
        assert_relative_eq!(engine.calculate(&up_out, &process).unwrap().npv, 0.1516, epsilon = 2e-3);

        let up_in = barrier(OptionType::Call, 120.0, ExerciseStyle::European, 365, BarrierType::UpIn, 130.0, 0.0);
        assert_relative_eq!(engine.calculate(&up_in, &process).unwrap().npv, 3.1200, epsilon = 2e-3);
    }

    #[test]
    fn test_american_knock_out_at_least_european() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let engine = FdBlackScholesEngine::default();
        let european = barrier(OptionType::Put, 100.0, ExerciseStyle::European, 365, BarrierType::UpOut, 120.0, 0.0);
        let american = barrier(OptionType::Put, 100.0, ExerciseStyle::American, 365, BarrierType::UpOut, 120.0, 0.0);

        let e = engine.calculate(&european, &process).unwrap().npv;
        let a = engine.calculate(&american, &process).unwrap().npv;
        assert!(a >= e);
    }

    #[test]
    fn test_touched_barrier_fails() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.2, 0.05));
        let contract = barrier(OptionType::Call, 100.0, ExerciseStyle::European, 365, BarrierType::DownOut, 100.0, 0.0);
        assert!(matches!(
            FdBlackScholesEngine::default().calculate(&contract, &process),
            Err(PricingError::BarrierTouched { .. })
        ));
    }

    #[test]
    fn test_zero_volatility_rejected() {
        let process = BlackScholesProcess::from_snapshot(&snapshot(100.0, 0.0, 0.05));
        let contract = vanilla(OptionType::Call, 100.0, ExerciseStyle::European, 365);
        assert!(matches!(
            FdBlackScholesEngine::default().calculate(&contract, &process),
            Err(PricingError::InvalidInput(msg)) if msg.contains("positive volatility")
        ));
    }

    // ========================================================================
    // Grid
    // ========================================================================

    #[test]
    fn test_grid_places_spot_and_barrier_on_nodes() {
        let b = Barrier::new(BarrierType::DownIn, 90.0, 0.0).unwrap();
        let grid = LogGrid::build(1000, 100.0, 80.0, 0.2, Some(&b)).unwrap();
        let ib = grid.barrier_index.unwrap();

        assert_relative_eq!(grid.spots[grid.spot_index], 100.0, epsilon = 1e-9);
        assert_relative_eq!(grid.spots[ib], 90.0, epsilon = 1e-9);
        assert!(ib > 0, "knock-in grid extends beyond the barrier");

        let b = Barrier::new(BarrierType::UpOut, 120.0, 0.0).unwrap();
        let grid = LogGrid::build(1000, 100.0, 110.0, 0.2, Some(&b)).unwrap();
        assert_eq!(grid.barrier_index, Some(999));
        assert_relative_eq!(grid.spots[999], 120.0, epsilon = 1e-9);
    }

    #[test]
    fn test_theta_step_keeps_constant_profile_without_rates() {
        // The operator annihilates constants when r = 0.
        let op = Operator::new(0.2, 0.0, 0.0, 0.1);
        let mut work = Tridiagonal::new(5);
        let mut values = vec![1.0; 5];
        work.theta_step(&mut values, &op, 0.5, 0.01, 1.0, 1.0);
        for v in values {
            assert_relative_eq!(v, 1.0, epsilon = 1e-12);
        }
    }
}
