//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `ADMIN_CORE` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use admin_core::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Worker polls every {:?}", config.events.poll_interval());
//! ```

mod database;
mod error;
mod events;
mod logging;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use events::{EventsConfig, MAX_POLL_INTERVAL_MS};
pub use logging::LoggingConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection; in-memory adapters are used when absent
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Domain event worker settings
    #[serde(default)]
    pub events: EventsConfig,

    /// Log level and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ADMIN_CORE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ADMIN_CORE__EVENTS__POLL_INTERVAL_MS=100` -> `events.poll_interval_ms = 100`
    /// - `ADMIN_CORE__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ADMIN_CORE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.events.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Whether events survive a restart.
    pub fn is_durable(&self) -> bool {
        self.database.is_some()
    }
}
