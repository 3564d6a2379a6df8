//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections or max is zero")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed ({0})")]
    PoolSizeTooLarge(u32),

    #[error("Event poll interval must be between 1 and {max} ms, got {actual}")]
    InvalidPollInterval { max: u64, actual: u64 },

    #[error("Unknown log level: {0}")]
    InvalidLogLevel(String),
}
