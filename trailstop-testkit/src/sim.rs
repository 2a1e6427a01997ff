//! Virtual-clock transport simulator.
//!
//! Delivers messages synchronously and deterministically: publications are
//! queued at the current virtual time (or `now + delay` for redelivery
//! requests) and popped in `(due, publication order)` order, advancing the
//! clock as they go. No real time is involved anywhere.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;

use trailstop_domain::Message;
use trailstop_engine::{MessageBus, StopLossEngine};

/// One queued delivery.
struct Scheduled {
    due: Decimal,
    seq: u64,
    message: Message,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due.cmp(&other.due).then(self.seq.cmp(&other.seq))
    }
}

struct SimInner {
    now: Decimal,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Scheduled>>,
    published: Vec<Message>,
}

/// Deterministic virtual-clock bus.
///
/// Clones share the same queue and clock, so a test hands one clone to the
/// engine and drives delivery through another.
#[derive(Clone)]
pub struct SimBus {
    inner: Arc<Mutex<SimInner>>,
}

impl SimBus {
    /// Create a bus with the virtual clock at zero.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SimInner {
                now: Decimal::ZERO,
                next_seq: 0,
                queue: BinaryHeap::new(),
                published: Vec::new(),
            })),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Decimal {
        self.inner.lock().unwrap().now
    }

    /// Every message published so far, in publication order (including
    /// redelivery requests and the engine's own outbound messages).
    pub fn published(&self) -> Vec<Message> {
        self.inner.lock().unwrap().published.clone()
    }

    /// Pop the next due delivery, advancing the virtual clock to its due
    /// time. Returns `None` when the queue is drained.
    pub fn next_due(&self) -> Option<Message> {
        let mut inner = self.inner.lock().unwrap();
        let Reverse(scheduled) = inner.queue.pop()?;
        inner.now = scheduled.due;
        Some(scheduled.message)
    }

    /// Deliver everything, in due order, into the engine until the queue is
    /// idle. Messages the engine publishes while consuming are scheduled and
    /// delivered in the same run.
    pub fn drain(&self, engine: &mut StopLossEngine<SimBus>) {
        while let Some(message) = self.next_due() {
            engine.consume(&message);
        }
    }

    /// Advance the virtual clock to `until`, delivering everything due on the
    /// way, in due order. Deliveries scheduled past `until` stay queued.
    pub fn run_until(&self, engine: &mut StopLossEngine<SimBus>, until: Decimal) {
        loop {
            let next = {
                let mut inner = self.inner.lock().unwrap();
                let ready = matches!(inner.queue.peek(), Some(Reverse(scheduled)) if scheduled.due <= until);
                if ready {
                    let Reverse(scheduled) = inner.queue.pop().unwrap();
                    inner.now = scheduled.due;
                    Some(scheduled.message)
                } else {
                    None
                }
            };

            match next {
                Some(message) => engine.consume(&message),
                None => break,
            }
        }

        let mut inner = self.inner.lock().unwrap();
        if inner.now < until {
            inner.now = until;
        }
    }
}

impl Default for SimBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBus for SimBus {
    fn publish(&self, message: Message) {
        let mut inner = self.inner.lock().unwrap();
        inner.published.push(message);

        let due = match &message {
            Message::DeliverAfter(request) => inner.now + request.delay,
            _ => inner.now,
        };

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.queue.push(Reverse(Scheduled { due, seq, message }));
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price;
    use rust_decimal_macros::dec;
    use trailstop_domain::{DeliverAfter, PriceUpdated, TargetUpdated};

    fn observed(value: Decimal) -> Message {
        Message::PriceUpdated(PriceUpdated { price: price(value) })
    }

    #[test]
    fn test_immediate_messages_deliver_in_publication_order() {
        let bus = SimBus::new();

        bus.publish(observed(dec!(1.5)));
        bus.publish(observed(dec!(1.2)));

        assert_eq!(bus.next_due(), Some(observed(dec!(1.5))));
        assert_eq!(bus.next_due(), Some(observed(dec!(1.2))));
        assert_eq!(bus.next_due(), None);
        assert_eq!(bus.now(), dec!(0));
    }

    #[test]
    fn test_deferred_messages_deliver_after_their_delay() {
        let bus = SimBus::new();

        let wrapper = Message::DeliverAfter(DeliverAfter {
            delay: dec!(7.0),
            payload: PriceUpdated { price: price(dec!(0.89)) },
        });
        bus.publish(wrapper);
        bus.publish(observed(dec!(0.91)));

        // The immediate message jumps the queue despite later publication
        assert_eq!(bus.next_due(), Some(observed(dec!(0.91))));
        assert_eq!(bus.now(), dec!(0));

        assert_eq!(bus.next_due(), Some(wrapper));
        assert_eq!(bus.now(), dec!(7.0));
    }

    #[test]
    fn test_clock_advances_monotonically_across_delay_classes() {
        let bus = SimBus::new();

        bus.publish(Message::DeliverAfter(DeliverAfter {
            delay: dec!(10.0),
            payload: PriceUpdated { price: price(dec!(1.5)) },
        }));
        bus.publish(Message::DeliverAfter(DeliverAfter {
            delay: dec!(7.0),
            payload: PriceUpdated { price: price(dec!(1.5)) },
        }));

        // Shorter delay first, even though it was published second
        let mut times = Vec::new();
        while bus.next_due().is_some() {
            times.push(bus.now());
        }
        assert_eq!(times, vec![dec!(7.0), dec!(10.0)]);
    }

    #[test]
    fn test_published_history_keeps_everything() {
        let bus = SimBus::new();

        bus.publish(observed(dec!(1.5)));
        bus.publish(Message::TargetUpdated(TargetUpdated { target: price(dec!(1.4)) }));

        let history = bus.published();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].kind(), "target_updated");
    }
}
