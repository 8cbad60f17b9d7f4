//! Analytical pricing formulas for European options.
//!
//! This module provides closed-form solutions:
//! - Black-Scholes-Merton with continuous dividend yield and full Greeks
//! - Reiner-Rubinstein single-barrier prices with rebate
//! - Standard normal CDF and PDF
//!
//! ## Design Principles
//!
//! - **Generic over `T: Float`**: works for `f64` and `f32`
//! - **Validated construction**: invalid spot or volatility is rejected up front

pub mod barrier;
pub mod black_scholes;
pub mod distributions;
pub mod error;

pub use barrier::{BarrierAnalytic, HitRebate};
pub use black_scholes::{BlackScholes, Greeks};
pub use distributions::{norm_cdf, norm_pdf};
pub use error::AnalyticalError;
