//! Trailstop Daemon
//!
//! Runtime host for the trailing-stop-loss engine.
//!
//! # Usage
//!
//! ```bash
//! # Start with default configuration
//! cargo run -p trailstopd
//!
//! # Start with custom environment
//! TRAILSTOP_ENV=test TRAILSTOP_TICK_MS=100 cargo run -p trailstopd
//! ```
//!
//! # Environment Variables
//!
//! - `TRAILSTOP_ENV`: Environment (test, development, production)
//! - `TRAILSTOP_OFFSET`: Stop offset below the reference price (default: 0.1)
//! - `TRAILSTOP_MOVE_DELAY`: Raise-target debounce delay in units (default: 10.0)
//! - `TRAILSTOP_TRIGGER_DELAY`: Trigger-sell debounce delay in units (default: 7.0)
//! - `TRAILSTOP_TICK_MS`: Real milliseconds per delay unit (default: 1000)
//! - `TRAILSTOP_BUS_CAPACITY`: Bus buffer size (default: 1000)

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use trailstopd::{Config, Daemon};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("trailstopd=info".parse()?))
        .init();

    // Load configuration
    let config = Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "Trailstop Daemon"
    );

    // Create the daemon and stop it on Ctrl-C
    let daemon = Daemon::new(config)?;
    let shutdown = daemon.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.cancel();
        }
    });

    daemon.run().await?;

    Ok(())
}
