//! Server settings loaded via OrthoConfig.
//!
//! Values come from `BOOKING_*` environment variables, command-line flags and
//! an optional configuration file. Credentials are read separately by
//! [`crate::inbound::http::auth_config`].

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{SeatAssignmentPolicy, UnknownSeatPolicy};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5_000;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    /// `BOOKING_DATABASE_URL` was not provided.
    #[error("missing required setting: database_url (BOOKING_DATABASE_URL)")]
    MissingDatabaseUrl,
    /// The bind address does not parse as `host:port`.
    #[error("invalid bind_address `{value}`: expected host:port")]
    InvalidBindAddress { value: String },
    /// The seat policy name is unknown.
    #[error(transparent)]
    SeatPolicy(#[from] UnknownSeatPolicy),
    /// Pools need at least one connection.
    #[error("db_max_connections must be at least 1")]
    EmptyPool,
}

/// Runtime settings for the booking server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BOOKING")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_address: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// How long an allocation waits for a train's lock, in milliseconds.
    pub allocation_lock_timeout_ms: Option<u64>,
    /// Seat numbering policy: `lowest_free` or `monotonic`.
    pub seat_policy: Option<String>,
    /// Apply embedded migrations before serving.
    pub run_migrations: Option<bool>,
}

impl AppSettings {
    /// Parse the bind address, falling back to `0.0.0.0:3000`.
    pub fn bind_address(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_address.as_deref().unwrap_or(DEFAULT_BIND_ADDRESS);
        raw.trim()
            .parse()
            .map_err(|_| SettingsError::InvalidBindAddress {
                value: raw.to_owned(),
            })
    }

    /// Return the database URL, which has no default.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Return the pool size, defaulting to 10.
    pub fn db_max_connections(&self) -> Result<u32, SettingsError> {
        match self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS) {
            0 => Err(SettingsError::EmptyPool),
            size => Ok(size),
        }
    }

    /// Return the allocation lock timeout, defaulting to five seconds.
    pub fn allocation_lock_timeout(&self) -> Duration {
        Duration::from_millis(
            self.allocation_lock_timeout_ms
                .unwrap_or(DEFAULT_LOCK_TIMEOUT_MS),
        )
    }

    /// Whether to apply migrations at startup, defaulting to `true`.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Parse the seat policy, defaulting to [`SeatAssignmentPolicy::LowestFree`].
    pub fn seat_policy(&self) -> Result<SeatAssignmentPolicy, SettingsError> {
        self.seat_policy
            .as_deref()
            .map_or(Ok(SeatAssignmentPolicy::default()), str::parse::<SeatAssignmentPolicy>)
            .map_err(SettingsError::from)
    }
}
