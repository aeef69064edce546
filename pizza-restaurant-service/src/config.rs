use std::env;
use std::net::{AddrParseError, SocketAddr};
use std::num::{NonZeroU32, ParseIntError};

use dotenvy::dotenv;

pub const DEFAULT_DATABASE_URL: &str = "app.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5555";
pub const DEFAULT_POOL_SIZE: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid BIND_ADDR `{value}`: {source}")]
    BindAddr {
        value: String,
        source: AddrParseError,
    },
    #[error("invalid DB_POOL_SIZE `{value}`: {source}")]
    PoolSize {
        value: String,
        source: ParseIntError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// SQLite file path or `file:` URI.
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub pool_size: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DB_URI")
            .or_else(|| lookup("DATABASE_URL"))
            .map(|url| normalize_database_url(&url))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_addr = match lookup("BIND_ADDR") {
            Some(value) => value
                .parse()
                .map_err(|source| ConfigError::BindAddr { value, source })?,
            None => DEFAULT_BIND_ADDR
                .parse()
                .map_err(|source| ConfigError::BindAddr {
                    value: DEFAULT_BIND_ADDR.to_string(),
                    source,
                })?,
        };

        let pool_size = match lookup("DB_POOL_SIZE") {
            Some(value) => value
                .parse::<NonZeroU32>()
                .map_err(|source| ConfigError::PoolSize { value, source })?
                .get(),
            None => DEFAULT_POOL_SIZE,
        };

        Ok(Config {
            database_url,
            bind_addr,
            pool_size,
        })
    }
}

/// Accepts SQLAlchemy-style `sqlite:///path` URLs as well as bare paths.
fn normalize_database_url(url: &str) -> String {
    match url.strip_prefix("sqlite://") {
        Some("") | Some("/") => ":memory:".to_string(),
        Some(rest) => rest.strip_prefix('/').unwrap_or(rest).to_string(),
        None => url.to_string(),
    }
}
