//! Connection pool management.
//!
//! One pool serves the whole process. [`Database::connect`] builds it, runs a
//! single acquire/release round trip as a health check, and fails fast when
//! the server is unreachable; a process must not serve traffic after that.
//! The handle is cheap to clone (the pool is reference-counted) and is meant
//! to be constructed once at startup and injected into consumers.

use crate::config::{DbConfig, MAX_CONNECTIONS};
use crate::error::{DalResult, Error};
use sqlx::MySqlPool;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use tracing::{debug, info};

/// The pool grows lazily from zero as load demands. sqlx has no max-idle
/// knob; the idle timeout reaps unused connections instead, and no
/// min-connections floor is set so reaping can drain the pool completely.
fn pool_options(config: &DbConfig) -> MySqlPoolOptions {
    MySqlPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .idle_timeout(Some(config.idle_timeout()))
        .test_before_acquire(true)
}

/// Shared handle to the process-wide MySQL connection pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: MySqlPool,
}

impl Database {
    /// Create the pool and verify it with one round trip.
    pub async fn connect(config: &DbConfig) -> DalResult<Self> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database)
            .charset("utf8mb4");

        debug!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Creating connection pool"
        );

        let pool = pool_options(config).connect_lazy_with(options);

        // One acquire/release round trip before declaring readiness.
        let conn = pool
            .acquire()
            .await
            .map_err(|e| Error::connection(format!("Health check failed: {}", e)))?;
        drop(conn);

        info!(
            host = %config.host,
            database = %config.database,
            max_connections = MAX_CONNECTIONS,
            "Connection pool ready"
        );

        Ok(Self { pool })
    }

    /// The underlying sqlx pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Close the pool. Optional; acceptable to skip on process shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Connection pool closed");
    }
}
