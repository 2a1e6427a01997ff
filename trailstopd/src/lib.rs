//! Trailstop Daemon Library
//!
//! Runtime host for the stop-loss engine.
//!
//! # Architecture
//!
//! ```text
//! Publishers (position feed, price feed)
//!        │
//!        ▼
//!   In-Memory Bus ──── scheduled redelivery (delay × tick)
//!        │                      ▲
//!        ▼                      │
//!   Stop-Loss Engine ───────────┘
//!        │
//!        ▼
//!   Subscribers (target updates, triggers)
//! ```
//!
//! # Components
//!
//! - **Daemon**: owns the bus and serializes delivery into one engine
//! - **InMemoryBus**: broadcast transport that honors `DeliverAfter`
//! - **Config**: environment-based configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use trailstopd::{Config, Daemon};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().expect("Failed to load config");
//!     let daemon = Daemon::new(config).expect("Invalid policy");
//!     daemon.run().await.expect("Daemon error");
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod daemon;
pub mod error;
pub mod event_bus;

// Re-exports for convenience
pub use config::{BusConfig, Config, EngineConfig, Environment};
pub use daemon::Daemon;
pub use error::{DaemonError, DaemonResult};
pub use event_bus::{BusReceiver, InMemoryBus};
