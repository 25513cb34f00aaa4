//! Client configuration.
//!
//! Values come from the environment (optionally seeded from `.env.local` /
//! `.env`), falling back to defaults that match the reference server setup.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;

pub const SERVER_URL_VAR: &str = "TRESENRAYA_SERVER_URL";
pub const MAX_ATTEMPTS_VAR: &str = "TRESENRAYA_RECONNECT_MAX_ATTEMPTS";
pub const STEP_MS_VAR: &str = "TRESENRAYA_RECONNECT_STEP_MS";
pub const MAX_DELAY_MS_VAR: &str = "TRESENRAYA_RECONNECT_MAX_DELAY_MS";

pub const DEFAULT_SERVER_URL: &str = "ws://localhost:8765";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_STEP_MS: u64 = 1_000;
pub const DEFAULT_MAX_DELAY_MS: u64 = 5_000;
const DEFAULT_COMMAND_BUFFER: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid server URL {value:?}: {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("Unsupported server URL scheme {0:?} (expected ws or wss)")]
    UnsupportedScheme(String),

    #[error("Invalid value {value:?} for {key}")]
    InvalidNumber { key: &'static str, value: String },
}

/// Linear reconnection backoff: `min(attempt * step, max_delay)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Retries allowed after a connection is lost before giving up
    pub max_attempts: u32,
    /// Delay added per attempt
    pub step: Duration,
    /// Upper bound on any single delay
    pub max_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            step: Duration::from_millis(DEFAULT_STEP_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl ReconnectPolicy {
    /// Delay to wait before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.step.saturating_mul(attempt).min(self.max_delay)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_url: String,
    pub reconnect: ReconnectPolicy,
    /// Capacity of the command queue between the UI and the session loop
    pub command_buffer: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            reconnect: ReconnectPolicy::default(),
            command_buffer: DEFAULT_COMMAND_BUFFER,
        }
    }
}

impl ClientConfig {
    /// Load from the process environment, after applying any dotenv files in
    /// the working directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Missing keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let server_url = match lookup(SERVER_URL_VAR) {
            Some(value) => validate_server_url(value.trim())?,
            None => defaults.server_url,
        };

        let reconnect = ReconnectPolicy {
            max_attempts: parse_var(&lookup, MAX_ATTEMPTS_VAR)?
                .unwrap_or(defaults.reconnect.max_attempts),
            step: parse_var(&lookup, STEP_MS_VAR)?
                .map(Duration::from_millis)
                .unwrap_or(defaults.reconnect.step),
            max_delay: parse_var(&lookup, MAX_DELAY_MS_VAR)?
                .map(Duration::from_millis)
                .unwrap_or(defaults.reconnect.max_delay),
        };

        Ok(Self {
            server_url,
            reconnect,
            command_buffer: defaults.command_buffer,
        })
    }
}

fn load_dotenv() {
    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = Path::new(filename);
        if path.exists() {
            if let Err(e) = dotenvy::from_path(path) {
                tracing::warn!("Failed to load {}: {}", filename, e);
            }
        }
    }
}

fn validate_server_url(value: &str) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        value: value.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "ws" | "wss" => Ok(value.to_string()),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
    }
}
