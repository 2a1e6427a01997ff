//! Debounce Decision Rules (Pure Functions)
//!
//! This module contains the pure rules evaluated when a delayed redelivery
//! confirms that a price observation has sustained.
//!
//! # Sustained-Movement Rules
//!
//! Both rules look at the extremes of the price window at confirmation time:
//! - Raise: stop target follows `min(window) - offset`, but only upward
//! - Trigger: the position is sold when `max(window)` is below the target
//!
//! Key invariants:
//! - The stop target is monotonic while a position is open (never re-lowered)
//! - The worst sustained price governs a raise; the best sustained price
//!   governs a trigger
//! - The two conditions are mutually exclusive for a given window

use crate::value_objects::Price;
use rust_decimal::Decimal;

/// Evaluate the raise-target rule.
///
/// The lowest price sustained since the last confirmation is the worst case
/// over the debounce window; the floor only rises when even that worst price
/// clears the current target.
///
/// # Returns
///
/// * `Some(new_target)` (`min_price - offset`) when `min_price` is above the
///   current target
/// * `None` when the window has not moved up as a whole
///
/// # Examples
///
/// ```
/// # use trailstop_domain::debounce::raise_target;
/// # use trailstop_domain::value_objects::Price;
/// # use rust_decimal_macros::dec;
/// // Window bottomed at 1.2, target still at 0.9: raise to 1.1
/// let min_price = Price::new(dec!(1.2)).unwrap();
/// assert_eq!(raise_target(min_price, dec!(0.9), dec!(0.1)), Some(dec!(1.1)));
///
/// // Window bottomed at 0.8, target at 0.9: no raise
/// let min_price = Price::new(dec!(0.8)).unwrap();
/// assert_eq!(raise_target(min_price, dec!(0.9), dec!(0.1)), None);
/// ```
pub fn raise_target(min_price: Price, current_target: Decimal, offset: Decimal) -> Option<Decimal> {
    if min_price.as_decimal() > current_target {
        Some(min_price.as_decimal() - offset)
    } else {
        None
    }
}

/// Evaluate the trigger rule.
///
/// Returns `true` when even the best sustained price in the window has fallen
/// below the protective floor, meaning the whole window sits under the target
/// and the position should be sold immediately.
///
/// # Examples
///
/// ```
/// # use trailstop_domain::debounce::should_trigger;
/// # use trailstop_domain::value_objects::Price;
/// # use rust_decimal_macros::dec;
/// let max_price = Price::new(dec!(0.89)).unwrap();
/// assert!(should_trigger(max_price, dec!(0.9)));
///
/// let max_price = Price::new(dec!(0.91)).unwrap();
/// assert!(!should_trigger(max_price, dec!(0.9)));
/// ```
pub fn should_trigger(max_price: Price, current_target: Decimal) -> bool {
    max_price.as_decimal() < current_target
}

// =============================================================================
// Tests
// =============================================================================
