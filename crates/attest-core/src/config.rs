//! Harness configuration.
//!
//! Everything the runner needs is passed in explicitly at construction;
//! there is no process-wide fixture state. Configuration is validated at
//! load time with clear error messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VerifyError};

/// Default environment variable holding the remote API token.
pub const DEFAULT_TOKEN_ENV: &str = "ENDPOINT_API_TOKEN";

/// Configuration for one verification harness instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Base URL of the remote API used for out-of-band lookups.
    pub api_base_url: String,

    /// Name of the environment variable holding the API token.
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Deadline for a single apply, destroy, or verification call.
    #[serde(default = "default_step_timeout")]
    #[serde(with = "humantime_serde")]
    pub step_timeout: Duration,

    /// Remote-lookup polling behavior.
    #[serde(default)]
    pub poll: PollConfig,
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

fn default_step_timeout() -> Duration {
    Duration::from_secs(300)
}

impl HarnessConfig {
    /// Creates a configuration with required fields and defaults elsewhere.
    #[must_use]
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            token_env: default_token_env(),
            step_timeout: default_step_timeout(),
            poll: PollConfig::default(),
        }
    }

    /// Sets the token environment variable name.
    #[must_use]
    pub fn with_token_env(mut self, var: impl Into<String>) -> Self {
        self.token_env = var.into();
        self
    }

    /// Sets the per-step deadline.
    #[must_use]
    pub const fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = timeout;
        self
    }

    /// Sets the polling configuration.
    #[must_use]
    pub const fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`VerifyError::Config`] if any field is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.is_empty() {
            return Err(VerifyError::config("api_base_url cannot be empty"));
        }
        if self.token_env.is_empty() {
            return Err(VerifyError::config("token_env cannot be empty"));
        }
        if self.step_timeout.is_zero() {
            return Err(VerifyError::config("step_timeout must be non-zero"));
        }
        self.poll.validate()
    }

    /// Parses a configuration from TOML text and validates it.
    ///
    /// # Errors
    /// Returns [`VerifyError::Config`] if parsing or validation fails.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| VerifyError::config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    /// Returns [`VerifyError::Config`] if the file cannot be read, parsed,
    /// or validated.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| VerifyError::config(format!("failed to read config: {e}")))?;
        Self::from_toml(&content)
    }
}

/// Bounded retry/poll configuration for remote lookups.
///
/// Remote propagation delay is the dominant flake source for acceptance
/// runs, so existence and absence checks poll with exponential backoff
/// instead of a single-shot read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Delay after the first unsatisfied observation.
    #[serde(with = "humantime_serde")]
    pub initial_delay: Duration,

    /// Upper bound on the delay between observations.
    #[serde(with = "humantime_serde")]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff.
    pub multiplier: f64,

    /// Total number of observations before giving up.
    pub attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
            attempts: 5,
        }
    }
}

impl PollConfig {
    /// Creates a poll configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-shot configuration: one observation, no retries.
    #[must_use]
    pub fn single_shot() -> Self {
        Self {
            attempts: 1,
            ..Self::default()
        }
    }

    /// Sets the initial delay.
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay.
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the backoff multiplier.
    #[must_use]
    pub const fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Sets the total number of observations.
    #[must_use]
    pub const fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Delay to sleep after the given zero-based attempt (exponential,
    /// clamped to `max_delay`).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base_secs = self.initial_delay.as_secs_f64();
        #[allow(clippy::cast_possible_wrap)] // attempt counts stay tiny
        let exp_secs = base_secs * self.multiplier.powi(attempt as i32);
        let clamped_secs = exp_secs.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(clamped_secs)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`VerifyError::Config`] if any field is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.attempts == 0 {
            return Err(VerifyError::config("poll.attempts must be at least 1"));
        }
        if self.multiplier < 1.0 {
            return Err(VerifyError::config("poll.multiplier must be at least 1.0"));
        }
        if self.max_delay < self.initial_delay {
            return Err(VerifyError::config(
                "poll.max_delay must not be below poll.initial_delay",
            ));
        }
        Ok(())
    }
}
