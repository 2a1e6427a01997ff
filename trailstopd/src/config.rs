//! Daemon configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::{DaemonError, DaemonResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::env;
use std::str::FromStr;

// =============================================================================
// Configuration
// =============================================================================

/// Daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Engine policy configuration
    pub engine: EngineConfig,

    /// Bus configuration
    pub bus: BusConfig,

    /// Environment (test, development, production)
    pub environment: Environment,
}

/// Engine policy configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Amount below a reference price at which the stop target sits
    pub offset: Decimal,
    /// Time units a price must sustain before it can raise the target
    pub move_delay: Decimal,
    /// Time units a price must sustain before it can trigger a sell
    pub trigger_delay: Decimal,
}

/// Bus configuration.
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// Broadcast channel capacity before slow receivers lag
    pub capacity: usize,
    /// Milliseconds of real time per abstract delay unit
    pub tick_ms: u64,
}

/// Environment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Test environment
    Test,
    /// Development environment
    Development,
    /// Production environment
    Production,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> DaemonResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let environment = Self::load_environment()?;
        let engine = Self::load_engine_config()?;
        let bus = Self::load_bus_config()?;

        Ok(Self {
            engine,
            bus,
            environment,
        })
    }

    /// Create test configuration: default policy, tiny tick, small bus.
    pub fn test() -> Self {
        Self {
            engine: EngineConfig {
                offset: dec!(0.1),
                move_delay: dec!(10.0),
                trigger_delay: dec!(7.0),
            },
            bus: BusConfig {
                capacity: 64,
                tick_ms: 10,
            },
            environment: Environment::Test,
        }
    }

    fn load_environment() -> DaemonResult<Environment> {
        let env_str = env::var("TRAILSTOP_ENV").unwrap_or_else(|_| "development".to_string());

        match env_str.to_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(DaemonError::Config(format!(
                "Invalid TRAILSTOP_ENV: {}. Expected: test, development, production",
                other
            ))),
        }
    }

    fn load_engine_config() -> DaemonResult<EngineConfig> {
        let offset = Self::load_decimal_env("TRAILSTOP_OFFSET", dec!(0.1))?;
        let move_delay = Self::load_decimal_env("TRAILSTOP_MOVE_DELAY", dec!(10.0))?;
        let trigger_delay = Self::load_decimal_env("TRAILSTOP_TRIGGER_DELAY", dec!(7.0))?;

        Ok(EngineConfig {
            offset,
            move_delay,
            trigger_delay,
        })
    }

    fn load_bus_config() -> DaemonResult<BusConfig> {
        let capacity_str = env::var("TRAILSTOP_BUS_CAPACITY").unwrap_or_else(|_| "1000".to_string());
        let capacity = capacity_str.parse::<usize>().map_err(|_| {
            DaemonError::Config(format!("Invalid TRAILSTOP_BUS_CAPACITY: {}", capacity_str))
        })?;

        let tick_str = env::var("TRAILSTOP_TICK_MS").unwrap_or_else(|_| "1000".to_string());
        let tick_ms = tick_str
            .parse::<u64>()
            .map_err(|_| DaemonError::Config(format!("Invalid TRAILSTOP_TICK_MS: {}", tick_str)))?;

        Ok(BusConfig { capacity, tick_ms })
    }

    fn load_decimal_env(key: &str, default: Decimal) -> DaemonResult<Decimal> {
        match env::var(key) {
            Ok(val) => Decimal::from_str(&val)
                .map_err(|_| DaemonError::Config(format!("Invalid {} value: {}", key, val))),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig {
                offset: dec!(0.1),
                move_delay: dec!(10.0),
                trigger_delay: dec!(7.0),
            },
            bus: BusConfig {
                capacity: 1000,
                tick_ms: 1000,
            },
            environment: Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
