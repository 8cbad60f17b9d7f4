//! Shared mutable market quotes.
//!
//! A [`SimpleQuote`] is a named scalar behind shared ownership. Every clone
//! observes the same cell, so term structures built from a quote see an
//! in-place change without being rebuilt.
//!
//! Perturbations go through [`SimpleQuote::bump`], which returns a
//! [`QuoteBump`] guard. Dropping the guard writes back the exact original
//! bits, also when the scope is left by unwinding.
//!
//! ```
//! use pricer_core::market_data::SimpleQuote;
//!
//! let spot = SimpleQuote::new("spot", 100.0);
//! let linked = spot.clone();
//! {
//!     let _bump = spot.bump(101.0);
//!     assert_eq!(linked.value(), 101.0);
//! }
//! assert_eq!(linked.value(), 100.0);
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Named mutable scalar shared between a snapshot and everything linked to it.
///
/// `SimpleQuote` is deliberately `!Send`: a snapshot and its quotes belong to
/// the thread that built them.
#[derive(Clone)]
pub struct SimpleQuote {
    name: Rc<str>,
    cell: Rc<Cell<f64>>,
}

impl SimpleQuote {
    /// Creates a quote with the given name and initial value.
    pub fn new(name: &str, value: f64) -> Self {
        Self {
            name: Rc::from(name),
            cell: Rc::new(Cell::new(value)),
        }
    }

    /// Quote name, used in logs and error messages.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current value.
    #[inline]
    pub fn value(&self) -> f64 {
        self.cell.get()
    }

    /// Overwrites the value for every linked observer.
    #[inline]
    pub fn set_value(&self, value: f64) {
        self.cell.set(value);
    }

    /// Sets the quote to `value` until the returned guard is dropped.
    ///
    /// ```
    /// use pricer_core::market_data::SimpleQuote;
    ///
    /// let vol = SimpleQuote::new("volatility", 0.2);
    /// let guard = vol.bump(0.21);
    /// assert_eq!(vol.value(), 0.21);
    /// drop(guard);
    /// assert_eq!(vol.value().to_bits(), 0.2_f64.to_bits());
    /// ```
    #[must_use = "the quote is restored as soon as the guard is dropped"]
    pub fn bump(&self, value: f64) -> QuoteBump<'_> {
        let original = self.cell.get();
        self.cell.set(value);
        QuoteBump {
            quote: self,
            original,
        }
    }

    /// True when both handles observe the same underlying cell.
    pub fn shares_cell_with(&self, other: &SimpleQuote) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl fmt::Debug for SimpleQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleQuote")
            .field("name", &self.name())
            .field("value", &self.value())
            .finish()
    }
}

/// Scope guard returned by [`SimpleQuote::bump`].
///
/// Restores the original value on drop.
pub struct QuoteBump<'a> {
    quote: &'a SimpleQuote,
    original: f64,
}

impl QuoteBump<'_> {
    /// Value the quote held before the bump.
    pub fn original(&self) -> f64 {
        self.original
    }

    /// Moves the bumped quote to another value while keeping the original.
    pub fn set(&self, value: f64) {
        self.quote.set_value(value);
    }
}

impl Drop for QuoteBump<'_> {
    fn drop(&mut self) {
        self.quote.cell.set(self.original);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    #[test]
    fn test_clones_share_value() {
        let q = SimpleQuote::new("rate", 0.05);
        let other = q.clone();
        q.set_value(0.06);
        assert_eq!(other.value(), 0.06);
        assert!(q.shares_cell_with(&other));
    }

    #[test]
    fn test_independent_quotes_do_not_share() {
        let a = SimpleQuote::new("spot", 100.0);
        let b = SimpleQuote::new("spot", 100.0);
        assert!(!a.shares_cell_with(&b));
    }

    #[test]
    fn test_guard_set_keeps_original() {
        let q = SimpleQuote::new("spot", 100.0);
        {
            let guard = q.bump(101.0);
            guard.set(99.0);
            assert_eq!(q.value(), 99.0);
            assert_eq!(guard.original(), 100.0);
        }
        assert_eq!(q.value(), 100.0);
    }

    #[test]
    fn test_restores_after_panic() {
        let q = SimpleQuote::new("spot", 100.0);
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _guard = q.bump(150.0);
            panic!("repricing blew up");
        }));
        assert!(result.is_err());
        assert_eq!(q.value().to_bits(), 100.0_f64.to_bits());
    }

    #[test]
    fn test_nested_bumps_unwind_in_order() {
        let q = SimpleQuote::new("spot", 100.0);
        {
            let _outer = q.bump(110.0);
            {
                let _inner = q.bump(120.0);
                assert_eq!(q.value(), 120.0);
            }
            assert_eq!(q.value(), 110.0);
        }
        assert_eq!(q.value(), 100.0);
    }

    proptest! {
        #[test]
        fn prop_bump_restores_exact_bits(v0 in -1.0e6f64..1.0e6, rel in -0.5f64..0.5) {
            let q = SimpleQuote::new("x", v0);
            let before = q.value().to_bits();
            {
                let h = v0 * rel;
                let _up = q.bump(v0 + h);
            }
            prop_assert_eq!(q.value().to_bits(), before);
        }
    }
}
