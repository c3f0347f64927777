//! Configuration management for the identity service
//!
//! Loads settings from environment variables, with a `.env` file picked up
//! in debug builds.
//!
//! # Example
//!
//! ```no_run
//! use marketplace_identity::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     println!("listening on {}", settings.server.bind_addr()?);
//!     Ok(())
//! }
//! ```

use anyhow::{bail, Context, Result};
use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// String that never shows up in `Debug` output or logs
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// Application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub redis: RedisSettings,
    pub jwt: JwtSettings,
    pub server: ServerSettings,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self> {
        // Load .env file in development
        if cfg!(debug_assertions) && dotenvy::dotenv().is_ok() {
            info!("Loaded .env file for development");
        }

        Ok(Settings {
            database: DatabaseSettings::from_env()?,
            redis: RedisSettings::from_env()?,
            jwt: JwtSettings::from_env()?,
            server: ServerSettings::from_env()?,
        })
    }
}

/// PostgreSQL connection settings
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// Connection string; may embed a password
    pub url: Secret,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Seconds to wait for a pooled connection
    pub acquire_timeout: u64,
    /// Per-query deadline in seconds
    pub query_timeout: u64,
}

impl DatabaseSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            url: Secret::new(env::var("DATABASE_URL").context("DATABASE_URL must be set")?),
            max_connections: parse_or("DATABASE_MAX_CONNECTIONS", 20)?,
            min_connections: parse_or("DATABASE_MIN_CONNECTIONS", 2)?,
            acquire_timeout: parse_or("DATABASE_ACQUIRE_TIMEOUT", 5)?,
            query_timeout: parse_or(
                "DATABASE_QUERY_TIMEOUT",
                resilience::database_timeout().duration.as_secs(),
            )?,
        })
    }
}

/// Redis connection settings
#[derive(Debug, Clone)]
pub struct RedisSettings {
    pub url: Secret,
    /// Per-command deadline in seconds
    pub response_timeout: u64,
}

impl RedisSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            url: Secret::new(env::var("REDIS_URL").context("REDIS_URL must be set")?),
            response_timeout: parse_or(
                "REDIS_RESPONSE_TIMEOUT",
                resilience::cache_timeout().duration.as_secs(),
            )?,
        })
    }
}

/// Access token settings
#[derive(Debug, Clone)]
pub struct JwtSettings {
    /// HS256 shared secret
    pub secret: Secret,
    /// Session cache TTL for issued tokens
    pub token_lifetime_hours: u64,
}

impl JwtSettings {
    fn from_env() -> Result<Self> {
        let secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if secret.is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        let token_lifetime_hours = parse_or("JWT_TOKEN_LIFETIME_HOURS", 24)?;
        if token_lifetime_hours == 0 {
            bail!("JWT_TOKEN_LIFETIME_HOURS must be greater than 0");
        }

        Ok(Self {
            secret: Secret::new(secret),
            token_lifetime_hours,
        })
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_lifetime_hours * 3600)
    }
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Whole-request deadline in seconds
    pub request_timeout: u64,
}

impl ServerSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("SERVER_PORT", 8080)?,
            request_timeout: parse_or("SERVER_REQUEST_TIMEOUT", 30)?,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid server address {}:{}", self.host, self.port))
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}", key)),
        Err(_) => Ok(default),
    }
}
