//! Daemon: runtime host for the stop-loss engine.
//!
//! The daemon owns the bus and a single engine instance, and serializes
//! delivery: one message at a time, consumed to completion, exactly as the
//! engine assumes. Publishers (a position feed, a price feed) publish through
//! the handle; subscribers observe target updates and triggers the same way.
//!
//! # Lifecycle
//!
//! 1. Load configuration
//! 2. Validate the stop policy and create the bus
//! 3. Main loop: deliver each bus message into the engine
//! 4. Graceful shutdown when the token fires

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use trailstop_domain::StopPolicy;
use trailstop_engine::StopLossEngine;

use crate::config::Config;
use crate::error::{DaemonError, DaemonResult};
use crate::event_bus::{BusReceiver, InMemoryBus};

// =============================================================================
// Daemon
// =============================================================================

/// The trailstop daemon.
pub struct Daemon {
    config: Config,
    policy: StopPolicy,
    bus: InMemoryBus,
    receiver: BusReceiver,
    shutdown: CancellationToken,
}

impl Daemon {
    /// Create a new daemon from configuration.
    ///
    /// The engine's subscription is taken here, so anything published through
    /// [`Daemon::handle`] after this call is guaranteed to reach the engine.
    ///
    /// # Errors
    /// Returns `DaemonError::Domain` when the configured policy is invalid.
    pub fn new(config: Config) -> DaemonResult<Self> {
        let policy = StopPolicy::new(
            config.engine.offset,
            config.engine.move_delay,
            config.engine.trigger_delay,
        )?;

        let bus = InMemoryBus::new(config.bus.capacity, Duration::from_millis(config.bus.tick_ms));
        let receiver = bus.subscribe();

        Ok(Self {
            config,
            policy,
            bus,
            receiver,
            shutdown: CancellationToken::new(),
        })
    }

    /// Handle for publishing into (and subscribing to) the daemon's bus.
    pub fn handle(&self) -> InMemoryBus {
        self.bus.clone()
    }

    /// Token that stops the run loop when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Run the daemon.
    ///
    /// Blocks until the shutdown token fires.
    pub async fn run(mut self) -> DaemonResult<()> {
        info!(
            environment = %self.config.environment,
            policy = %self.policy,
            tick_ms = self.config.bus.tick_ms,
            "Starting trailstop daemon"
        );

        let mut engine = StopLossEngine::with_policy(self.bus.clone(), self.policy);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Daemon received shutdown signal");
                    break;
                }
                received = self.receiver.recv() => {
                    match received {
                        Some(Ok(message)) => engine.consume(&message),
                        Some(Err(lag_msg)) => {
                            warn!(%lag_msg, "Engine receiver lagged");
                        }
                        None => {
                            return Err(DaemonError::Bus("Bus closed unexpectedly".to_string()));
                        }
                    }
                }
            }
        }

        info!("Daemon stopped");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
