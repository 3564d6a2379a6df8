//! Domain event worker configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound on the idle poll interval.
pub const MAX_POLL_INTERVAL_MS: u64 = 60_000;

/// Settings for the background domain event worker.
#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    /// How long the worker sleeps when the queue is empty, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl EventsConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.poll_interval_ms == 0 || self.poll_interval_ms > MAX_POLL_INTERVAL_MS {
            return Err(ValidationError::InvalidPollInterval {
                max: MAX_POLL_INTERVAL_MS,
                actual: self.poll_interval_ms,
            });
        }
        Ok(())
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    50
}
