//! Configuration for the data-access layer.
//!
//! Connection settings come from environment variables (`DB_HOST`, `DB_USER`,
//! ...) via clap so that library consumers and binaries share one surface.
//! Pool tuning is fixed at crate level to match the deployment profile.

use crate::error::{DalResult, Error};
use clap::Parser;
use std::time::Duration;

pub const DEFAULT_DB_HOST: &str = "127.0.0.1";
pub const DEFAULT_DB_PORT: u16 = 3306;

// Pool tuning constants. These are deliberately not configurable per call:
// one pool serves the whole process.
pub const MAX_CONNECTIONS: u32 = 120;
pub const IDLE_TIMEOUT_MS: u64 = 300_000;

/// Database connection settings.
#[derive(Debug, Clone, Parser)]
#[command(name = "mysql-dal")]
pub struct DbConfig {
    /// Database server host
    #[arg(long, default_value = DEFAULT_DB_HOST, env = "DB_HOST")]
    pub host: String,

    /// Database server port
    #[arg(long, default_value_t = DEFAULT_DB_PORT, env = "DB_PORT")]
    pub port: u16,

    /// Database user
    #[arg(long, env = "DB_USER")]
    pub user: String,

    /// Database password (sensitive - never logged)
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Database (schema) name
    #[arg(long, env = "DB_DATABASE")]
    pub database: String,
}

impl DbConfig {
    /// Read configuration from the environment.
    ///
    /// Fails with [`Error::InvalidArgument`] when a required variable is
    /// missing; never exits the process.
    pub fn from_env() -> DalResult<Self> {
        // No CLI args; clap falls back to env vars for every field.
        Self::parse_args(["mysql-dal"])
    }

    fn parse_args<I, T>(args: I) -> DalResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args).map_err(|e| Error::invalid_argument(e.to_string()))
    }

    /// Build a configuration explicitly (useful for tests and embedding).
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
            password: password.into(),
            database: database.into(),
        }
    }

    /// Idle timeout as a Duration.
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(IDLE_TIMEOUT_MS)
    }
}
