//! Server configuration read from the environment.

use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;

use hexrealm_engine::EngineConfig;
use hexrealm_game::domain::map::MapDimensionBounds;

use crate::error::AppError;

/// Everything the binary needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// PostgreSQL event store. Events are kept in memory when unset.
    pub database_url: Option<String>,
    /// OTLP collector for span export. Export is off when unset.
    pub otlp_endpoint: Option<String>,
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but cannot be parsed
    /// or the engine values are inconsistent.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = EngineConfig::default();
        let engine = EngineConfig {
            map_width: parse_or(&lookup, "MAP_WIDTH", defaults.map_width)?,
            map_height: parse_or(&lookup, "MAP_HEIGHT", defaults.map_height)?,
            map_bounds: MapDimensionBounds {
                min: parse_or(&lookup, "MAP_MIN_DIMENSION", defaults.map_bounds.min)?,
                max: parse_or(&lookup, "MAP_MAX_DIMENSION", defaults.map_bounds.max)?,
            },
            max_command_attempts: parse_or(
                &lookup,
                "COMMAND_MAX_ATTEMPTS",
                defaults.max_command_attempts,
            )?,
            reaction_max_attempts: parse_or(
                &lookup,
                "REACTION_MAX_ATTEMPTS",
                defaults.reaction_max_attempts,
            )?,
            reaction_backoff: defaults.reaction_backoff,
        };
        engine
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 3000)?,
            database_url: non_empty(lookup("DATABASE_URL")),
            otlp_endpoint: non_empty(lookup("OTEL_EXPORTER_OTLP_ENDPOINT")),
            engine,
        })
    }

    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse_or<T>(lookup: impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} is invalid: {e}"))),
        None => Ok(default),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
