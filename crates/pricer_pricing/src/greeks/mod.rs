//! Result sets and bump-and-reprice sensitivities.
//!
//! - [`ResultSet`]: the six reported quantities with their provenance
//! - [`BumpEstimator`]: fills Greeks an engine does not supply

pub mod bump;
mod result;

pub use bump::BumpEstimator;
pub use result::{Quantity, QuantityValue, ResultSet};
