//! Worker configuration.

use std::time::Duration;

use thiserror::Error;

use super::binder::CapabilityNames;

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Stop after this long without a successfully processed message.
    pub idle_timeout: Duration,

    /// Pause between loop ticks.
    pub poll_interval: Duration,

    /// Send `{"uuid", "error"}` replies for failed calls instead of dropping
    /// them silently.
    pub error_replies: bool,

    pub capabilities: CapabilityNames,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("idle timeout must be greater than zero")]
    ZeroIdleTimeout,

    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("capability name for {0} must not be empty")]
    EmptyCapabilityName(&'static str),
}

impl WorkerConfig {
    /// Config from the two numeric knobs, everything else default.
    pub fn from_parts(idle_timeout_seconds: u64, poll_interval_ms: u64) -> Self {
        Self {
            idle_timeout: Duration::from_secs(idle_timeout_seconds),
            poll_interval: Duration::from_millis(poll_interval_ms),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.idle_timeout.is_zero() {
            return Err(ConfigError::ZeroIdleTimeout);
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.capabilities.inbox.is_empty() {
            return Err(ConfigError::EmptyCapabilityName("inbox"));
        }
        if self.capabilities.outbox.is_empty() {
            return Err(ConfigError::EmptyCapabilityName("outbox"));
        }
        Ok(())
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            error_replies: false,
            capabilities: CapabilityNames::default(),
        }
    }
}
