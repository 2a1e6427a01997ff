//! Price window: the multiset of prices awaiting confirmation.
//!
//! One entry is added per observed price update, and at most one entry is
//! removed per matching delayed redelivery. Insertion order is irrelevant for
//! evaluation; only the minimum and maximum matter.

use crate::value_objects::Price;

/// Ordered multiset of prices observed since their last confirmation.
///
/// Removal matches by value and removes a single occurrence. Duplicate prices
/// are therefore ambiguous on removal: which occurrence goes is unspecified
/// beyond "the first one found".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceWindow {
    prices: Vec<Price>,
}

impl PriceWindow {
    /// Create an empty window
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observed price
    pub fn push(&mut self, price: Price) {
        self.prices.push(price);
    }

    /// Minimum price in the window, or `None` when empty
    pub fn min(&self) -> Option<Price> {
        self.prices.iter().min().copied()
    }

    /// Maximum price in the window, or `None` when empty
    pub fn max(&self) -> Option<Price> {
        self.prices.iter().max().copied()
    }

    /// Remove a single occurrence matching `price` by value.
    ///
    /// Returns `true` if an occurrence was removed. A miss is a no-op: a
    /// redelivery can arrive after the window was emptied by a trigger, and
    /// the window tolerates that.
    pub fn remove_one(&mut self, price: Price) -> bool {
        match self.prices.iter().position(|p| *p == price) {
            Some(index) => {
                self.prices.remove(index);
                true
            }
            None => false,
        }
    }

    /// Empty the window
    pub fn clear(&mut self) {
        self.prices.clear();
    }

    /// Whether the window holds no prices
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Number of prices currently in the window
    pub fn len(&self) -> usize {
        self.prices.len()
    }
}

// =============================================================================
// Tests
// =============================================================================
