//! Market data: quotes, snapshots and the flat term structures built on them.
//!
//! # Components
//!
//! - [`quote`]: Shared mutable scalars with scoped restore (SimpleQuote, QuoteBump)
//! - [`snapshot`]: Per-request market state (MarketSnapshot)
//! - [`curves`]: Yield curve trait and the quote-linked FlatForward
//! - [`surfaces`]: Volatility trait and the quote-linked BlackConstantVol
//! - [`error`]: Market data error types (MarketDataError)
//!
//! # Example
//!
//! ```
//! use pricer_core::market_data::curves::{FlatForward, YieldCurve};
//! use pricer_core::market_data::surfaces::{BlackConstantVol, VolatilitySurface};
//! use pricer_core::market_data::MarketSnapshot;
//! use pricer_core::types::Date;
//!
//! let snapshot = MarketSnapshot::new(Date::from_ymd(2024, 1, 2).unwrap(), 100.0, 0.20, 0.05);
//! let curve = FlatForward::new(
//!     snapshot.valuation_date(),
//!     snapshot.risk_free_rate().clone(),
//!     snapshot.day_count(),
//! );
//! let vol = BlackConstantVol::new(snapshot.volatility().clone(), snapshot.day_count());
//!
//! assert!((curve.discount_factor(1.0).unwrap() - 0.951229).abs() < 1e-5);
//! assert_eq!(vol.volatility(100.0, 1.0).unwrap(), 0.20);
//! ```

pub mod curves;
pub mod error;
pub mod quote;
pub mod snapshot;
pub mod surfaces;

pub use curves::{FlatForward, YieldCurve};
pub use error::MarketDataError;
pub use quote::{QuoteBump, SimpleQuote};
pub use snapshot::MarketSnapshot;
pub use surfaces::{BlackConstantVol, VolatilitySurface};
