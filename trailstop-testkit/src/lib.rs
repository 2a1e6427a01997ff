//! Test doubles for the Trailstop transport.
//!
//! Provides a recording fake (captures everything, delivers nothing) and a
//! virtual-clock simulator that honors delayed redelivery synchronously and
//! deterministically.

mod recording;
mod sim;

pub use recording::RecordingBus;
pub use sim::SimBus;

use rust_decimal::Decimal;
use trailstop_domain::Price;

/// Build a validated `Price`, panicking on invalid input.
///
/// Convenience for tests that construct many prices from literals.
pub fn price(value: Decimal) -> Price {
    Price::new(value).expect("test price must be positive")
}
