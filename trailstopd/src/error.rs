//! Daemon error types.

use thiserror::Error;
use trailstop_domain::DomainError;

/// Daemon-level errors.
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Domain error
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Bus error
    #[error("Bus error: {0}")]
    Bus(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for daemon operations.
pub type DaemonResult<T> = Result<T, DaemonError>;
