//! The stop-loss engine: a two-state machine driven entirely by messages.
//!
//! States are *Flat* (no position, everything ignored) and *Holding*
//! (position open, prices tracked). The engine never holds timers: each
//! observed price is sent back to the transport wrapped in a `DeliverAfter`
//! request, once per debounce class, and the wrapper coming back is the
//! confirmation that the observation has sustained that long.

use rust_decimal::Decimal;
use tracing::{debug, info};

use trailstop_domain::{
    debounce, DeliverAfter, Message, PositionAcquired, Price, PriceUpdated, PriceWindow,
    StopLossTriggered, StopPolicy, TargetUpdated,
};

use crate::ports::MessageBus;

// =============================================================================
// Stop-Loss Engine
// =============================================================================

/// Trailing-stop-loss decision engine for a single open position.
///
/// One instance tracks one position; never share an instance across threads
/// without external synchronization. All output goes through the bus.
pub struct StopLossEngine<B: MessageBus> {
    /// Transport the engine publishes into
    bus: B,
    /// Tuning parameters (offset and the two debounce delays)
    policy: StopPolicy,
    /// Acquisition price; `Some` means Holding, `None` means Flat
    acquired_price: Option<Price>,
    /// Prices observed since their last confirmation
    window: PriceWindow,
    /// Most recently published stop target; meaningless while Flat
    current_target: Decimal,
}

impl<B: MessageBus> StopLossEngine<B> {
    /// Create an engine with the default policy (offset 0.1, delays 10/7).
    pub fn new(bus: B) -> Self {
        Self::with_policy(bus, StopPolicy::default())
    }

    /// Create an engine with an explicit policy.
    pub fn with_policy(bus: B, policy: StopPolicy) -> Self {
        Self {
            bus,
            policy,
            acquired_price: None,
            window: PriceWindow::new(),
            current_target: Decimal::ZERO,
        }
    }

    /// Whether a position is currently open.
    pub fn is_holding(&self) -> bool {
        self.acquired_price.is_some()
    }

    /// The most recently published stop target, while a position is open.
    pub fn current_target(&self) -> Option<Decimal> {
        self.acquired_price.map(|_| self.current_target)
    }

    /// Process one inbound message to completion.
    ///
    /// No return value; all output is published. Message kinds the engine
    /// does not handle (its own outbound kinds echoed back by the transport)
    /// are silently ignored.
    pub fn consume(&mut self, message: &Message) {
        match message {
            Message::PositionAcquired(msg) => self.on_position_acquired(msg),
            Message::PriceUpdated(msg) => self.on_price_updated(msg),
            Message::DeliverAfter(msg) => self.on_redelivery(msg),
            Message::TargetUpdated(_) | Message::StopLossTriggered(_) => {
                debug!(kind = message.kind(), "ignoring unhandled message kind");
            }
        }
    }

    /// (Re)open the position and publish the initial stop target.
    ///
    /// Re-acquiring while already holding is accepted and resets tracking;
    /// the window is left as-is, so confirmations scheduled in a previous
    /// cycle are evaluated against the new position.
    fn on_position_acquired(&mut self, msg: &PositionAcquired) {
        self.acquired_price = Some(msg.price);
        let target = msg.price.as_decimal() - self.policy.offset();
        self.publish_target(target);

        info!(price = %msg.price, target = %target, "position acquired, stop target set");
    }

    /// Record an observed price and request both debounce confirmations.
    fn on_price_updated(&mut self, msg: &PriceUpdated) {
        if self.acquired_price.is_none() {
            debug!(price = %msg.price, "price update while flat, ignoring");
            return;
        }

        self.window.push(msg.price);

        // Move-target request first, then trigger-sell; both wrap the same
        // observation.
        self.bus.publish(Message::DeliverAfter(DeliverAfter {
            delay: self.policy.move_delay(),
            payload: *msg,
        }));
        self.bus.publish(Message::DeliverAfter(DeliverAfter {
            delay: self.policy.trigger_delay(),
            payload: *msg,
        }));

        debug!(price = %msg.price, pending = self.window.len(), "price recorded, confirmations requested");
    }

    /// Confirmation step: a wrapped observation has sustained its delay.
    ///
    /// Both rules run on every redelivery, whichever delay class produced it;
    /// the engine only reacts to the window content at this instant. The
    /// judged price is removed from the window afterwards, so it no longer
    /// counts toward future evaluations for that class.
    fn on_redelivery(&mut self, msg: &DeliverAfter) {
        let Some(acquired) = self.acquired_price else {
            debug!(price = %msg.payload.price, "redelivery while flat, ignoring");
            return;
        };

        let min_price = self.window.min().unwrap_or(acquired);
        if let Some(raised) = debounce::raise_target(min_price, self.current_target, self.policy.offset()) {
            self.publish_target(raised);
            info!(min = %min_price, target = %raised, "sustained rise, stop target raised");
        }

        let max_price = self.window.max().unwrap_or(acquired);
        if debounce::should_trigger(max_price, self.current_target) {
            self.acquired_price = None;
            self.window.clear();
            self.bus.publish(Message::StopLossTriggered(StopLossTriggered {}));
            info!(max = %max_price, target = %self.current_target, "sustained drop below target, stop loss triggered");
        }

        self.window.remove_one(msg.payload.price);
    }

    fn publish_target(&mut self, target: Decimal) {
        self.current_target = target;
        self.bus.publish(Message::TargetUpdated(TargetUpdated {
            target: Price::from(target),
        }));
    }
}
