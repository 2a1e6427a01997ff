//! Trailstop Domain Layer
//!
//! Pure domain logic with zero I/O dependencies.
//! Contains the message vocabulary, value objects, the price window, and the
//! debounce decision rules.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod debounce;
pub mod messages;
pub mod policy;
pub mod value_objects;
pub mod window;

// Re-export commonly used types
pub use debounce::{raise_target, should_trigger};
pub use messages::{
    DeliverAfter, Message, PositionAcquired, PriceUpdated, StopLossTriggered, TargetUpdated,
};
pub use policy::StopPolicy;
pub use value_objects::{DomainError, Price};
pub use window::PriceWindow;
