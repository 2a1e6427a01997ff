//! Engine port definitions.
//!
//! Ports define the interfaces for external collaborators. The engine has
//! exactly one: the message transport it publishes into. Adapters implement
//! the port for specific transports (in-memory broadcast, recording fake,
//! virtual-clock simulator).

use trailstop_domain::Message;

/// Port for the message transport.
///
/// `publish` is fire-and-forget: no acknowledgement is returned and the
/// engine never learns whether anyone consumed the message.
///
/// Transports must honor the delayed-redelivery contract: publishing a
/// `Message::DeliverAfter` wrapper must, after the stated delay has elapsed
/// in the transport's own clock, re-present that same wrapper to the
/// consumers of this bus. The engine uses this as its only timing mechanism.
///
/// The transport is also responsible for serializing delivery to a given
/// engine instance; the engine assumes one message at a time.
///
/// Implementations:
/// - `InMemoryBus` (trailstopd) - tokio broadcast with scaled real delays
/// - `RecordingBus` (testkit) - captures everything, delivers nothing
/// - `SimBus` (testkit) - deterministic virtual-clock delivery
pub trait MessageBus: Send + Sync {
    /// Enqueue a message for eventual delivery.
    fn publish(&self, message: Message);
}
