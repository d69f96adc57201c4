//! Application settings loaded from environment variables.

use std::env;
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::str::FromStr;

use super::constants::{
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS,
    DEFAULT_KEEPALIVE_INTERVAL_SECS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    MAX_JWT_EXPIRATION_HOURS, MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Development-only signing secret, used when `JWT_SECRET` is unset in debug builds.
const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    /// Allowed CORS origins; empty means any origin.
    pub cors_allowed_origins: Vec<String>,
    /// Base URL pinged periodically to keep a hosted instance awake.
    pub keepalive_url: Option<String>,
    pub keepalive_interval_secs: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("database_max_connections", &self.database_max_connections)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("keepalive_url", &self.keepalive_url)
            .field("keepalive_interval_secs", &self.keepalive_interval_secs)
            .finish()
    }
}

impl Config {
    /// Create a configuration with defaults for everything but the
    /// database URL and signing secret.
    ///
    /// # Errors
    /// Returns a validation error if the secret is shorter than
    /// `MIN_JWT_SECRET_LENGTH`.
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> AppResult<Self> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::validation(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        Ok(Self {
            database_url: database_url.into(),
            database_max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            jwt_secret,
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            cors_allowed_origins: Vec::new(),
            keepalive_url: None,
            keepalive_interval_secs: DEFAULT_KEEPALIVE_INTERVAL_SECS,
        })
    }

    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// `JWT_SECRET` is mandatory in release builds.
    ///
    /// # Errors
    /// Returns a validation error for any variable that is set but malformed
    /// or out of range.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) => secret,
            None if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            None => {
                return Err(AppError::validation(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let mut config = Self::new(database_url, jwt_secret)?;

        if let Some(max) = parse_var(&lookup, "DATABASE_MAX_CONNECTIONS", 1..=u32::MAX)? {
            config.database_max_connections = max;
        }
        if let Some(hours) =
            parse_var(&lookup, "JWT_EXPIRATION_HOURS", 1..=MAX_JWT_EXPIRATION_HOURS)?
        {
            config.jwt_expiration_hours = hours;
        }
        if let Some(host) = lookup("SERVER_HOST") {
            config.server_host = host;
        }
        if let Some(port) = parse_var(&lookup, "SERVER_PORT", 0..=u16::MAX)? {
            config.server_port = port;
        }
        config.cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_default();
        config.keepalive_url = lookup("KEEPALIVE_URL").filter(|v| !v.is_empty());
        if let Some(secs) = parse_var(&lookup, "KEEPALIVE_INTERVAL_SECS", 1..=u64::MAX)? {
            config.keepalive_interval_secs = secs;
        }

        Ok(config)
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Parse an optional variable. Unset is `None`; set but malformed or
/// outside `range` is an error.
fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    range: RangeInclusive<T>,
) -> AppResult<Option<T>>
where
    T: FromStr + PartialOrd + Display,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };

    let value: T = raw
        .trim()
        .parse()
        .map_err(|_| AppError::validation(format!("{} has an invalid value: {:?}", key, raw)))?;
    if !range.contains(&value) {
        return Err(AppError::validation(format!(
            "{} must be between {} and {}",
            key,
            range.start(),
            range.end()
        )));
    }

    Ok(Some(value))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
