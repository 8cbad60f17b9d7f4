//! Discount curves used by the Black-Scholes process.
//!
//! This module provides:
//! - [`YieldCurve`]: Discount factor and rate lookup by year fraction
//! - [`FlatForward`]: Constant continuously compounded rate linked to a quote

mod flat;
mod traits;

pub use flat::FlatForward;
pub use traits::YieldCurve;
