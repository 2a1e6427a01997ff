//! Stop policy: the engine's tuning parameters.

use crate::value_objects::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Policy parameters for the stop-loss engine.
///
/// - `offset`: amount below a reference price at which the stop target sits
/// - `move_delay`: time units a price must sustain before it can raise the
///   target
/// - `trigger_delay`: time units a price must sustain before it can trigger
///   a sell
///
/// Delays are abstract time units; the transport owns the unit scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopPolicy {
    offset: Decimal,
    move_delay: Decimal,
    trigger_delay: Decimal,
}

impl StopPolicy {
    /// Create a new StopPolicy with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPolicy` if:
    /// - Offset <= 0
    /// - Either delay <= 0
    pub fn new(
        offset: Decimal,
        move_delay: Decimal,
        trigger_delay: Decimal,
    ) -> Result<Self, DomainError> {
        if offset <= Decimal::ZERO {
            return Err(DomainError::InvalidPolicy("Offset must be positive".to_string()));
        }

        if move_delay <= Decimal::ZERO {
            return Err(DomainError::InvalidPolicy("Move delay must be positive".to_string()));
        }

        if trigger_delay <= Decimal::ZERO {
            return Err(DomainError::InvalidPolicy("Trigger delay must be positive".to_string()));
        }

        Ok(Self { offset, move_delay, trigger_delay })
    }

    /// Get the stop offset
    pub fn offset(&self) -> Decimal {
        self.offset
    }

    /// Get the raise-target debounce delay
    pub fn move_delay(&self) -> Decimal {
        self.move_delay
    }

    /// Get the trigger-sell debounce delay
    pub fn trigger_delay(&self) -> Decimal {
        self.trigger_delay
    }
}

impl Default for StopPolicy {
    fn default() -> Self {
        Self {
            offset: Decimal::new(1, 1),        // 0.1
            move_delay: Decimal::from(10),     // 10.0
            trigger_delay: Decimal::from(7),   // 7.0
        }
    }
}

impl fmt::Display for StopPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StopPolicy {{ offset: {}, move_delay: {}, trigger_delay: {} }}",
            self.offset, self.move_delay, self.trigger_delay
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
