//! Message vocabulary for the Trailstop engine.
//!
//! Messages are the only way state enters or leaves the engine: the caller
//! publishes position and price updates, the engine publishes target updates,
//! stop-loss triggers, and delayed-redelivery requests. The `DeliverAfter`
//! wrapper travels both ways: the engine publishes it as a request, and the
//! transport re-presents the same wrapper after the stated delay.

use crate::value_objects::Price;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A position was opened (or re-opened) at the given price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionAcquired {
    /// Acquisition price
    pub price: Price,
}

/// A new market price was observed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdated {
    /// Observed price
    pub price: Price,
}

/// Request to the transport: re-present `payload` to this consumer after
/// `delay` time units have elapsed.
///
/// The engine uses redelivery as its only clock: a wrapped price observation
/// coming back confirms that the observation is `delay` units old.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeliverAfter {
    /// Delay in abstract time units; the transport owns the unit scale
    pub delay: Decimal,
    /// The wrapped price observation
    pub payload: PriceUpdated,
}

/// The protective stop target moved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetUpdated {
    /// New stop target price
    pub target: Price,
}

/// The position fell below its protective floor and should be sold now.
///
/// Carries no payload: the engine tracks a single position, so the trigger
/// itself is the whole decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopLossTriggered {}

// =============================================================================
// Message
// =============================================================================

/// The full wire vocabulary, as a tagged union.
///
/// Dispatch happens explicitly in the engine; kinds the engine does not
/// handle (its own outbound messages echoed back by the transport) are
/// silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// A position was opened at a price
    PositionAcquired(PositionAcquired),
    /// A market price was observed
    PriceUpdated(PriceUpdated),
    /// Delayed-redelivery wrapper (request and redelivery alike)
    DeliverAfter(DeliverAfter),
    /// The stop target moved
    TargetUpdated(TargetUpdated),
    /// The stop loss fired
    StopLossTriggered(StopLossTriggered),
}

impl Message {
    /// Get the wire tag of this message kind
    pub fn kind(&self) -> &'static str {
        match self {
            Message::PositionAcquired(_) => "position_acquired",
            Message::PriceUpdated(_) => "price_updated",
            Message::DeliverAfter(_) => "deliver_after",
            Message::TargetUpdated(_) => "target_updated",
            Message::StopLossTriggered(_) => "stop_loss_triggered",
        }
    }
}

impl From<PositionAcquired> for Message {
    fn from(msg: PositionAcquired) -> Self {
        Message::PositionAcquired(msg)
    }
}

impl From<PriceUpdated> for Message {
    fn from(msg: PriceUpdated) -> Self {
        Message::PriceUpdated(msg)
    }
}

impl From<DeliverAfter> for Message {
    fn from(msg: DeliverAfter) -> Self {
        Message::DeliverAfter(msg)
    }
}

impl From<TargetUpdated> for Message {
    fn from(msg: TargetUpdated) -> Self {
        Message::TargetUpdated(msg)
    }
}

impl From<StopLossTriggered> for Message {
    fn from(msg: StopLossTriggered) -> Self {
        Message::StopLossTriggered(msg)
    }
}

// =============================================================================
// Tests
// =============================================================================
