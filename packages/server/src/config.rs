//! Server configuration.
//!
//! Values come from command-line flags with environment fallbacks. The binary
//! loads an optional `.env` file before parsing.

use std::fmt;

use chrono::FixedOffset;
use clap::Parser;
use reportcast_shared::time::offset_from_hours;
use thiserror::Error;

/// Largest UTC offset a campus timezone can have, in hours
const MAX_UTC_OFFSET_HOURS: u32 = 14;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("JWT secret must not be empty")]
    EmptyJwtSecret,

    #[error("request page limit must be greater than zero")]
    ZeroPageLimit,

    #[error("UTC offset {0}h is outside ±14h")]
    UtcOffsetOutOfRange(i32),
}

#[derive(Parser, Clone)]
#[command(name = "reportcast-server")]
#[command(about = "Real-time report and metrics fan-out server", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "REPORTCAST_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "REPORTCAST_PORT", default_value = "3000")]
    pub port: u16,

    /// HS256 secret shared with the token issuer
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// PostgreSQL connection string; in-memory stores are used when unset
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Page size for recent and annual report requests
    #[arg(long, env = "REPORTCAST_PAGE_LIMIT", default_value = "100")]
    pub request_page_limit: u32,

    /// Campus timezone as whole hours east of UTC
    #[arg(
        long,
        env = "REPORTCAST_UTC_OFFSET_HOURS",
        default_value = "0",
        allow_negative_numbers = true
    )]
    pub utc_offset_hours: i32,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::EmptyJwtSecret);
        }
        if self.request_page_limit == 0 {
            return Err(ConfigError::ZeroPageLimit);
        }
        self.utc_offset()?;
        Ok(())
    }

    /// Campus timezone
    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        if self.utc_offset_hours.unsigned_abs() > MAX_UTC_OFFSET_HOURS {
            return Err(ConfigError::UtcOffsetOutOfRange(self.utc_offset_hours));
        }
        offset_from_hours(self.utc_offset_hours)
            .ok_or(ConfigError::UtcOffsetOutOfRange(self.utc_offset_hours))
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "<redacted>"),
            )
            .field("request_page_limit", &self.request_page_limit)
            .field("utc_offset_hours", &self.utc_offset_hours)
            .field("log_level", &self.log_level)
            .finish()
    }
}
