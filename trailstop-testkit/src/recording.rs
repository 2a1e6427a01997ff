//! Recording fake for the message bus.

use std::sync::{Arc, Mutex};

use trailstop_domain::{DeliverAfter, Message, TargetUpdated};
use trailstop_engine::MessageBus;

/// Fake transport that records every published message and delivers nothing.
///
/// Clones share the same recording, so a test can hand one clone to the
/// engine and keep another for assertions.
#[derive(Clone, Default)]
pub struct RecordingBus {
    messages: Arc<Mutex<Vec<Message>>>,
}

impl RecordingBus {
    /// Create an empty recording bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages published so far, in publication order.
    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().unwrap().clone()
    }

    /// The most recently published target update, if any.
    pub fn last_target(&self) -> Option<TargetUpdated> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|message| match message {
                Message::TargetUpdated(update) => Some(*update),
                _ => None,
            })
    }

    /// All delayed-redelivery requests published so far, in order.
    pub fn deliver_requests(&self) -> Vec<DeliverAfter> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter_map(|message| match message {
                Message::DeliverAfter(request) => Some(*request),
                _ => None,
            })
            .collect()
    }

    /// How many stop-loss triggers were published.
    pub fn trigger_count(&self) -> usize {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|message| matches!(message, Message::StopLossTriggered(_)))
            .count()
    }

    /// Number of recorded messages.
    pub fn len(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    /// Whether nothing has been published.
    pub fn is_empty(&self) -> bool {
        self.messages.lock().unwrap().is_empty()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.messages.lock().unwrap().clear();
    }
}

impl MessageBus for RecordingBus {
    fn publish(&self, message: Message) {
        self.messages.lock().unwrap().push(message);
    }
}

// =============================================================================
// Tests
// =============================================================================
