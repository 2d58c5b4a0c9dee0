//! Runtime configuration loaded from the process environment.

use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the `PostgreSQL` connection URL.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Environment variable overriding the pool size.
pub const MAX_CONNECTIONS_VAR: &str = "REVIEWROSTER_DB_MAX_CONNECTIONS";
/// Environment variable overriding the number of connection attempts.
pub const CONNECT_ATTEMPTS_VAR: &str = "REVIEWROSTER_DB_CONNECT_ATTEMPTS";
/// Environment variable overriding the delay between connection attempts.
pub const RETRY_DELAY_MS_VAR: &str = "REVIEWROSTER_DB_RETRY_DELAY_MS";

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CONNECT_ATTEMPTS: u32 = 30;
const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("environment variable {name} has invalid value '{value}'")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Offending raw value.
        value: String,
    },
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    url: String,
    max_connections: u32,
    connect_attempts: u32,
    retry_delay: Duration,
}

impl DatabaseConfig {
    /// Creates settings for `url` with default pool and retry values.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }

    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `DATABASE_URL` is missing or an override
    /// is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the URL is missing or an override is not
    /// a positive integer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup(DATABASE_URL_VAR)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing(DATABASE_URL_VAR))?;

        let mut config = Self::new(url.trim());
        if let Some(value) = parse_positive::<u32>(&lookup, MAX_CONNECTIONS_VAR)? {
            config.max_connections = value;
        }
        if let Some(value) = parse_positive::<u32>(&lookup, CONNECT_ATTEMPTS_VAR)? {
            config.connect_attempts = value;
        }
        if let Some(value) = parse_positive::<u64>(&lookup, RETRY_DELAY_MS_VAR)? {
            config.retry_delay = Duration::from_millis(value);
        }
        Ok(config)
    }

    /// Sets the maximum pool size.
    #[must_use]
    pub const fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Sets how many times connecting is attempted before giving up.
    #[must_use]
    pub const fn with_connect_attempts(mut self, connect_attempts: u32) -> Self {
        self.connect_attempts = connect_attempts;
        self
    }

    /// Sets the pause between connection attempts.
    #[must_use]
    pub const fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Checks that the pool size and retry delay are positive.
    ///
    /// Values read through [`Self::from_lookup`] always pass; the builder
    /// methods accept zero and are checked here before a pool is built.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the variable that controls the
    /// offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid {
                name: MAX_CONNECTIONS_VAR,
                value: self.max_connections.to_string(),
            });
        }
        if self.retry_delay.is_zero() {
            return Err(ConfigError::Invalid {
                name: RETRY_DELAY_MS_VAR,
                value: self.retry_delay.as_millis().to_string(),
            });
        }
        Ok(())
    }

    /// Returns the connection URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the maximum pool size.
    #[must_use]
    pub const fn max_connections(&self) -> u32 {
        self.max_connections
    }

    /// Returns the number of connection attempts.
    #[must_use]
    pub const fn connect_attempts(&self) -> u32 {
        self.connect_attempts
    }

    /// Returns the pause between connection attempts.
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        self.retry_delay
    }
}

fn parse_positive<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let invalid = || ConfigError::Invalid {
        name,
        value: raw.clone(),
    };
    let value = raw.trim().parse::<T>().map_err(|_| invalid())?;
    if value <= T::default() {
        return Err(invalid());
    }
    Ok(Some(value))
}
