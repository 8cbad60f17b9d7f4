//! Stochastic process models.
//!
//! This module provides:
//! - [`BlackScholesProcess`]: lognormal spot with flat rate, dividend and
//!   volatility term structures linked to snapshot quotes
//!
//! ## Example
//!
//! ```
//! use pricer_core::market_data::MarketSnapshot;
//! use pricer_core::types::Date;
//! use pricer_models::models::BlackScholesProcess;
//!
//! let snapshot = MarketSnapshot::new(Date::from_ymd(2024, 1, 2).unwrap(), 100.0, 0.2, 0.05);
//! let process = BlackScholesProcess::from_snapshot(&snapshot);
//!
//! let bs = process.black_scholes().unwrap();
//! assert!((bs.price_call(100.0, 1.0) - 10.4506).abs() < 1e-4);
//! ```

pub mod process;

pub use process::BlackScholesProcess;
