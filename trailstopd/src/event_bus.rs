//! In-memory message transport.
//!
//! The bus carries the full wire vocabulary between publishers (position and
//! price feeds), the engine, and subscribers (whoever acts on target updates
//! and triggers). It honors the delayed-redelivery contract: a published
//! `DeliverAfter` wrapper is held back and re-broadcast once its delay has
//! elapsed, scaled by the configured tick.
//!
//! Uses tokio broadcast channels for fan-out to multiple receivers.

use std::time::Duration;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tokio::sync::broadcast;
use tracing::debug;

use trailstop_domain::Message;
use trailstop_engine::MessageBus;

// =============================================================================
// In-Memory Bus
// =============================================================================

/// Broadcast transport with scheduled redelivery.
///
/// Multiple producers can publish, and multiple consumers can receive; every
/// consumer sees every message, including the redelivered wrappers. There is
/// no cancellation: once a `DeliverAfter` is published, it will come back.
///
/// `publish` must be called from within a tokio runtime, since scheduling a
/// redelivery spawns a sleep task.
#[derive(Clone)]
pub struct InMemoryBus {
    sender: broadcast::Sender<Message>,
    tick: Duration,
}

impl InMemoryBus {
    /// Create a new bus.
    ///
    /// `capacity` bounds how many messages can be buffered before slow
    /// receivers start missing events (lagging). `tick` is the real duration
    /// of one abstract delay unit.
    pub fn new(capacity: usize, tick: Duration) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender, tick }
    }

    /// Subscribe to messages.
    ///
    /// Returns a receiver that will see all messages sent after subscription.
    pub fn subscribe(&self) -> BusReceiver {
        BusReceiver {
            receiver: self.sender.subscribe(),
        }
    }

    /// Get the number of active receivers.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Real duration of `delay` abstract units on this bus.
    fn delay_to_duration(&self, delay: Decimal) -> Duration {
        let units = delay.to_f64().unwrap_or(0.0).max(0.0);
        self.tick.mul_f64(units)
    }

    /// Send to all subscribers; returns how many received it.
    fn broadcast(&self, message: Message) -> usize {
        // send() errs when there are no receivers; that is not our problem
        self.sender.send(message).unwrap_or(0)
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new(1000, Duration::from_secs(1))
    }
}

impl MessageBus for InMemoryBus {
    fn publish(&self, message: Message) {
        match message {
            Message::DeliverAfter(request) => {
                let bus = self.clone();
                let wait = self.delay_to_duration(request.delay);
                debug!(delay = %request.delay, wait_ms = wait.as_millis() as u64, "redelivery scheduled");

                tokio::spawn(async move {
                    tokio::time::sleep(wait).await;
                    bus.broadcast(Message::DeliverAfter(request));
                });
            }
            other => {
                self.broadcast(other);
            }
        }
    }
}

// =============================================================================
// Receiver
// =============================================================================

/// Receiver for bus messages.
pub struct BusReceiver {
    receiver: broadcast::Receiver<Message>,
}

impl BusReceiver {
    /// Receive the next message.
    ///
    /// Returns `None` if the sender has been dropped.
    /// Returns an error description if the receiver lagged (missed messages).
    pub async fn recv(&mut self) -> Option<Result<Message, String>> {
        match self.receiver.recv().await {
            Ok(message) => Some(Ok(message)),
            Err(broadcast::error::RecvError::Closed) => None,
            Err(broadcast::error::RecvError::Lagged(count)) => {
                Some(Err(format!("Receiver lagged, missed {} messages", count)))
            }
        }
    }

    /// Try to receive a message without blocking.
    ///
    /// Returns `None` if no message is immediately available.
    pub fn try_recv(&mut self) -> Option<Result<Message, String>> {
        match self.receiver.try_recv() {
            Ok(message) => Some(Ok(message)),
            Err(broadcast::error::TryRecvError::Empty) => None,
            Err(broadcast::error::TryRecvError::Closed) => None,
            Err(broadcast::error::TryRecvError::Lagged(count)) => {
                Some(Err(format!("Receiver lagged, missed {} messages", count)))
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
