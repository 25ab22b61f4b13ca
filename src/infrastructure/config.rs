//! Application configuration management.
//!
//! Configuration is loaded once at startup from environment variables (and a
//! `.env` file if present). Every value has a default, so an empty
//! environment yields a working local setup.
//!
//! # Environment Variables
//!
//! - `APP_HOST`: Server host (default: `0.0.0.0`)
//! - `APP_PORT`: Server port (default: `8000`)
//! - `ALLOWED_ORIGINS`: Comma-separated origins allowed for CORS and
//!   WebSocket upgrades (default: `http://localhost:5173,http://127.0.0.1:5173`)
//! - `NOTIFY_RETRY_ATTEMPTS`: Attempts before an undeliverable event is
//!   dropped (default: `10`)
//! - `NOTIFY_RETRY_DELAY_MS`: Delay between attempts (default: `100`)
//! - `WS_IDLE_TIMEOUT_SECS`: Idle time before a ping is sent (default: `30`)

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use super::notification::RetryPolicy;

/// Origins accepted when `ALLOWED_ORIGINS` is not set.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];

/// Configuration error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        /// The name of the environment variable.
        key: String,
        /// Description of why the value is invalid.
        message: String,
    },
}

/// Settings of the WebSocket notification subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationConfig {
    /// Retry applied to toggle outcome events while nobody is subscribed.
    pub retry: RetryPolicy,
    /// Idle time after which a ping is sent to a connection.
    pub idle_timeout: Duration,
}

impl NotificationConfig {
    /// Default idle timeout before a ping.
    pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            idle_timeout: Self::DEFAULT_IDLE_TIMEOUT,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// HTTP server host address.
    pub app_host: String,
    /// HTTP server port.
    pub app_port: u16,
    /// Origins allowed to call the API and open notification sockets.
    pub allowed_origins: Vec<String>,
    /// Notification channel settings.
    pub notification: NotificationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_host: "0.0.0.0".to_string(),
            app_port: 8000,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(ToString::to_string)
                .collect(),
            notification: NotificationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set but cannot
    /// be parsed, or if a count/timeout is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a map instead of touching the
    /// process environment.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let app_host = lookup("APP_HOST").unwrap_or(defaults.app_host);
        let app_port = parse_or("APP_PORT", &lookup, defaults.app_port)?;
        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map_or(defaults.allowed_origins, |value| parse_origins(&value));

        let max_attempts = parse_or(
            "NOTIFY_RETRY_ATTEMPTS",
            &lookup,
            defaults.notification.retry.max_attempts,
        )?;
        if max_attempts == 0 {
            return Err(invalid("NOTIFY_RETRY_ATTEMPTS", "must be greater than 0"));
        }
        let delay_ms = parse_or(
            "NOTIFY_RETRY_DELAY_MS",
            &lookup,
            duration_millis(defaults.notification.retry.delay),
        )?;
        let idle_secs = parse_or(
            "WS_IDLE_TIMEOUT_SECS",
            &lookup,
            defaults.notification.idle_timeout.as_secs(),
        )?;
        if idle_secs == 0 {
            return Err(invalid("WS_IDLE_TIMEOUT_SECS", "must be greater than 0"));
        }

        Ok(Self {
            app_host,
            app_port,
            allowed_origins,
            notification: NotificationConfig {
                retry: RetryPolicy::new(max_attempts, Duration::from_millis(delay_ms)),
                idle_timeout: Duration::from_secs(idle_secs),
            },
        })
    }

    /// Returns `host:port` for binding the listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app_host, self.app_port)
    }

    /// Returns true if `origin` is in the allow-list.
    #[must_use]
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse()
            .map_err(|error: T::Err| invalid(key, error.to_string()))
    })
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
