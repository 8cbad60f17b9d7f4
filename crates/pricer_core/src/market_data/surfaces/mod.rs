//! Volatility term structures.
//!
//! This module provides:
//! - [`VolatilitySurface`]: Black volatility lookup by strike and expiry
//! - [`BlackConstantVol`]: Flat volatility linked to a quote

mod flat;
mod traits;

pub use flat::BlackConstantVol;
pub use traits::VolatilitySurface;
