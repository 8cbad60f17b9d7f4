//! Numerical parameters for every engine and for the bump estimator.
//!
//! Defaults:
//!
//! | Section | Parameter | Default |
//! |---------|-----------|---------|
//! | `finite_difference` | `time_steps` x `grid_points` | 1000 x 1000 |
//! | `monte_carlo` | `seed` | 42 |
//! | `monte_carlo` | `required_tolerance` | 0.02 |
//! | `monte_carlo` | `time_steps` | 1 |
//! | `monte_carlo` | `min_samples` / `max_samples` | 1023 / 1 000 000 |
//! | `binomial` | `steps` | 1000 |
//! | `bump` | `relative` / `theta_days` | 0.01 / 1 |
//!
//! With the `serde` feature every section deserialises with per-field
//! defaults, so a partial TOML file or environment override is enough.

use crate::error::ConfigError;

/// Maximum Monte Carlo sample count.
pub const MAX_SAMPLES: usize = 10_000_000;

/// Maximum number of time steps for any engine.
pub const MAX_STEPS: usize = 100_000;

/// Grid point limits for the finite-difference engine.
pub const MIN_GRID_POINTS: usize = 5;
/// Upper grid point limit.
pub const MAX_GRID_POINTS: usize = 100_000;

/// All engine parameters.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::EngineSettings;
///
/// let settings = EngineSettings::default();
/// assert_eq!(settings.finite_difference.grid_points, 1000);
/// assert_eq!(settings.monte_carlo.seed(), 42);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct EngineSettings {
    /// Crank-Nicolson grid
    pub finite_difference: FiniteDifferenceSettings,
    /// Monte Carlo sampling
    pub monte_carlo: MonteCarloSettings,
    /// Binomial lattice
    pub binomial: BinomialSettings,
    /// Bump-and-reprice estimator
    pub bump: BumpSettings,
}

impl EngineSettings {
    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.finite_difference.validate()?;
        self.monte_carlo.validate()?;
        self.binomial.validate()?;
        self.bump.validate()
    }
}

/// Finite-difference grid size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FiniteDifferenceSettings {
    /// Time steps from maturity back to valuation
    pub time_steps: usize,
    /// Spatial nodes in log-spot
    pub grid_points: usize,
}

impl Default for FiniteDifferenceSettings {
    fn default() -> Self {
        Self {
            time_steps: 1000,
            grid_points: 1000,
        }
    }
}

impl FiniteDifferenceSettings {
    /// Checks step and grid bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_steps == 0 || self.time_steps > MAX_STEPS {
            return Err(ConfigError::InvalidStepCount(self.time_steps));
        }
        if self.grid_points < MIN_GRID_POINTS || self.grid_points > MAX_GRID_POINTS {
            return Err(ConfigError::InvalidGridSize(self.grid_points));
        }
        Ok(())
    }
}

/// Binomial lattice size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct BinomialSettings {
    /// Lattice steps
    pub steps: usize,
}

impl Default for BinomialSettings {
    fn default() -> Self {
        Self { steps: 1000 }
    }
}

impl BinomialSettings {
    /// Delta and gamma are read off the second layer, so at least 3 steps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps < 3 || self.steps > MAX_STEPS {
            return Err(ConfigError::InvalidStepCount(self.steps));
        }
        Ok(())
    }
}

/// Bump sizes for the sensitivity estimator.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct BumpSettings {
    /// Relative bump applied to spot, volatility and rate
    pub relative: f64,
    /// Calendar days the valuation date advances for theta
    pub theta_days: u32,
}

impl Default for BumpSettings {
    fn default() -> Self {
        Self {
            relative: 0.01,
            theta_days: 1,
        }
    }
}

impl BumpSettings {
    /// Relative bump must lie in (0, 1); theta needs at least one day.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.relative > 0.0 && self.relative < 1.0) {
            return Err(ConfigError::InvalidParameter {
                name: "bump.relative",
                value: format!("{} must be in (0, 1)", self.relative),
            });
        }
        if self.theta_days == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "bump.theta_days",
                value: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Monte Carlo sampling parameters.
///
/// Use [`MonteCarloSettings::builder`] to construct validated instances.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::settings::MonteCarloSettings;
///
/// let settings = MonteCarloSettings::builder()
///     .seed(7)
///     .time_steps(52)
///     .required_tolerance(0.05)
///     .build()
///     .expect("valid settings");
///
/// assert_eq!(settings.time_steps(), 52);
/// assert_eq!(settings.min_samples(), 1023);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct MonteCarloSettings {
    seed: u64,
    required_tolerance: f64,
    time_steps: usize,
    min_samples: usize,
    max_samples: usize,
    brownian_bridge: bool,
}

impl Default for MonteCarloSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            required_tolerance: 0.02,
            time_steps: 1,
            min_samples: 1023,
            max_samples: 1_000_000,
            brownian_bridge: true,
        }
    }
}

impl MonteCarloSettings {
    /// Creates a builder seeded with the defaults.
    #[inline]
    pub fn builder() -> MonteCarloSettingsBuilder {
        MonteCarloSettingsBuilder::default()
    }

    /// Generator seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Target standard error of the NPV estimate.
    #[inline]
    pub fn required_tolerance(&self) -> f64 {
        self.required_tolerance
    }

    /// Time steps per path.
    #[inline]
    pub fn time_steps(&self) -> usize {
        self.time_steps
    }

    /// Size of the first batch.
    #[inline]
    pub fn min_samples(&self) -> usize {
        self.min_samples
    }

    /// Sample cap; reaching it above tolerance fails the valuation.
    #[inline]
    pub fn max_samples(&self) -> usize {
        self.max_samples
    }

    /// Whether barrier crossings between monitoring points are weighted
    /// with the Brownian-bridge probability.
    #[inline]
    pub fn brownian_bridge(&self) -> bool {
        self.brownian_bridge
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `min_samples` is 0 or above `max_samples`, or `max_samples` exceeds 10,000,000
    /// - `time_steps` is 0 or greater than 100,000
    /// - `required_tolerance` is not a positive finite number
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_samples == 0 || self.min_samples > self.max_samples || self.max_samples > MAX_SAMPLES
        {
            return Err(ConfigError::InvalidSampleCount {
                min: self.min_samples,
                max: self.max_samples,
            });
        }
        if self.time_steps == 0 || self.time_steps > MAX_STEPS {
            return Err(ConfigError::InvalidStepCount(self.time_steps));
        }
        if !(self.required_tolerance.is_finite() && self.required_tolerance > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "monte_carlo.required_tolerance",
                value: format!("{} must be positive", self.required_tolerance),
            });
        }
        Ok(())
    }
}

/// Builder for [`MonteCarloSettings`].
///
/// Unset fields keep their defaults; [`build`](Self::build) validates.
#[derive(Clone, Debug, Default)]
pub struct MonteCarloSettingsBuilder {
    inner: MonteCarloSettings,
}

impl MonteCarloSettingsBuilder {
    /// Sets the generator seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.inner.seed = seed;
        self
    }

    /// Sets the target standard error.
    #[inline]
    pub fn required_tolerance(mut self, tolerance: f64) -> Self {
        self.inner.required_tolerance = tolerance;
        self
    }

    /// Sets the number of time steps per path.
    #[inline]
    pub fn time_steps(mut self, time_steps: usize) -> Self {
        self.inner.time_steps = time_steps;
        self
    }

    /// Sets the first batch size.
    #[inline]
    pub fn min_samples(mut self, min_samples: usize) -> Self {
        self.inner.min_samples = min_samples;
        self
    }

    /// Sets the sample cap.
    #[inline]
    pub fn max_samples(mut self, max_samples: usize) -> Self {
        self.inner.max_samples = max_samples;
        self
    }

    /// Enables or disables the Brownian-bridge crossing correction.
    #[inline]
    pub fn brownian_bridge(mut self, enabled: bool) -> Self {
        self.inner.brownian_bridge = enabled;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when [`MonteCarloSettings::validate`] fails.
    pub fn build(self) -> Result<MonteCarloSettings, ConfigError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_parameters() {
        let s = EngineSettings::default();
        assert_eq!(s.finite_difference.time_steps, 1000);
        assert_eq!(s.finite_difference.grid_points, 1000);
        assert_eq!(s.binomial.steps, 1000);
        assert_eq!(s.monte_carlo.seed(), 42);
        assert_eq!(s.monte_carlo.required_tolerance(), 0.02);
        assert_eq!(s.monte_carlo.time_steps(), 1);
        assert_eq!(s.monte_carlo.min_samples(), 1023);
        assert_eq!(s.monte_carlo.max_samples(), 1_000_000);
        assert!(s.monte_carlo.brownian_bridge());
        assert_eq!(s.bump.relative, 0.01);
        assert_eq!(s.bump.theta_days, 1);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let mc = MonteCarloSettings::builder()
            .seed(1)
            .min_samples(100)
            .max_samples(1000)
            .brownian_bridge(false)
            .build()
            .unwrap();
        assert_eq!(mc.seed(), 1);
        assert_eq!(mc.min_samples(), 100);
        assert_eq!(mc.max_samples(), 1000);
        assert!(!mc.brownian_bridge());
        assert_eq!(mc.required_tolerance(), 0.02);
    }

    #[test]
    fn test_builder_rejects_bad_samples() {
        let result = MonteCarloSettings::builder()
            .min_samples(2000)
            .max_samples(1000)
            .build();
        assert_eq!(
            result,
            Err(ConfigError::InvalidSampleCount {
                min: 2000,
                max: 1000
            })
        );

        assert!(MonteCarloSettings::builder().min_samples(0).build().is_err());
        assert!(MonteCarloSettings::builder()
            .max_samples(MAX_SAMPLES + 1)
            .build()
            .is_err());
    }

    #[test]
    fn test_builder_rejects_bad_steps_and_tolerance() {
        assert_eq!(
            MonteCarloSettings::builder().time_steps(0).build(),
            Err(ConfigError::InvalidStepCount(0))
        );
        assert!(MonteCarloSettings::builder()
            .required_tolerance(0.0)
            .build()
            .is_err());
        assert!(MonteCarloSettings::builder()
            .required_tolerance(f64::NAN)
            .build()
            .is_err());
    }

    #[test]
    fn test_grid_and_lattice_bounds() {
        let fd = FiniteDifferenceSettings {
            time_steps: 10,
            grid_points: 4,
        };
        assert_eq!(fd.validate(), Err(ConfigError::InvalidGridSize(4)));

        let fd = FiniteDifferenceSettings {
            time_steps: 0,
            grid_points: 100,
        };
        assert_eq!(fd.validate(), Err(ConfigError::InvalidStepCount(0)));

        assert!(BinomialSettings { steps: 2 }.validate().is_err());
        assert!(BinomialSettings { steps: 3 }.validate().is_ok());
    }

    #[test]
    fn test_bump_bounds() {
        let mut bump = BumpSettings::default();
        bump.relative = 0.0;
        assert!(bump.validate().is_err());
        bump.relative = 1.5;
        assert!(bump.validate().is_err());
        bump.relative = 0.001;
        bump.theta_days = 0;
        assert!(bump.validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_deserialisation_keeps_defaults() {
        let json = r#"{ "monte_carlo": { "seed": 7 }, "binomial": { "steps": 200 } }"#;
        let s: EngineSettings = serde_json::from_str(json).unwrap();
        assert_eq!(s.monte_carlo.seed(), 7);
        assert_eq!(s.monte_carlo.required_tolerance(), 0.02);
        assert_eq!(s.binomial.steps, 200);
        assert_eq!(s.finite_difference, FiniteDifferenceSettings::default());
    }
}
