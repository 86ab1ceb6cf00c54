//! Monitor configuration and fail-fast validation.

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced before the monitor starts polling. These are usage
/// errors, not runtime faults.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("target url must not be empty")]
    EmptyTarget,

    #[error("poll interval must be positive")]
    ZeroInterval,
}

/// Settings for one monitoring run against a single target.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// The URL to check.
    pub target: String,
    /// Time between scheduled probes.
    pub interval: Duration,
    /// Deadline for a single probe, including shutdown-time probes.
    pub timeout: Duration,
    /// Report every check instead of only state changes.
    pub verbose: bool,
}

impl MonitorConfig {
    pub fn new(target: impl Into<String>, interval: Duration, timeout: Duration) -> Self {
        Self {
            target: target.into(),
            interval,
            timeout,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Reject configurations the poller must not run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target.trim().is_empty() {
            return Err(ConfigError::EmptyTarget);
        }
        if self.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}
