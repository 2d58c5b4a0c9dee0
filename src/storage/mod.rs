//! `PostgreSQL` connection bootstrap shared by the storage adapters.
//!
//! [`connect`] builds an r2d2 pool and keeps retrying until the database
//! answers or the configured attempts run out. [`apply_schema`] installs the
//! bundled table definitions. Both calls block and belong on a blocking
//! thread when used from async code.

use crate::config::{ConfigError, DatabaseConfig};
use diesel::PgConnection;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;
use tracing::{info, warn};

/// `PostgreSQL` connection pool type shared by every adapter.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Schema installed by [`apply_schema`].
const SCHEMA_SQL: &str =
    include_str!("../../migrations/2025-11-10-000000_create_review_tables/up.sql");

/// Errors raised while bootstrapping storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The settings cannot produce a connection pool.
    #[error("invalid database configuration: {0}")]
    Config(#[from] ConfigError),

    /// The database never became reachable.
    #[error("database unreachable after {attempts} attempts: {source}")]
    Unreachable {
        /// Number of attempts made.
        attempts: u32,
        /// Last pool error observed.
        #[source]
        source: PoolError,
    },

    /// A pooled connection could not be obtained.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),

    /// Executing the schema failed.
    #[error("schema installation failed: {0}")]
    Schema(#[from] diesel::result::Error),
}

/// Connects to the configured database, retrying until it is reachable.
///
/// # Errors
///
/// Returns [`StorageError::Config`] when the pool size or retry delay is
/// zero, and [`StorageError::Unreachable`] when every attempt fails.
pub fn connect(config: &DatabaseConfig) -> Result<PgPool, StorageError> {
    config.validate()?;
    let attempts = config.connect_attempts().max(1);
    let mut attempt = 1;
    loop {
        let manager = ConnectionManager::<PgConnection>::new(config.url());
        match Pool::builder()
            .max_size(config.max_connections())
            .connection_timeout(config.retry_delay())
            .build(manager)
        {
            Ok(pool) => {
                info!(attempt, "database connection established");
                return Ok(pool);
            }
            Err(source) if attempt >= attempts => {
                return Err(StorageError::Unreachable { attempts, source });
            }
            Err(err) => {
                warn!(attempt, attempts, error = %err, "database not ready yet");
                std::thread::sleep(config.retry_delay());
                attempt += 1;
            }
        }
    }
}

/// Creates the directory and pull request tables when they are missing.
///
/// # Errors
///
/// Returns [`StorageError`] when no connection is available or the schema
/// statements fail.
pub fn apply_schema(pool: &PgPool) -> Result<(), StorageError> {
    let mut connection = pool.get()?;
    connection.batch_execute(SCHEMA_SQL)?;
    info!("database schema applied");
    Ok(())
}
