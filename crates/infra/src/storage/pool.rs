//! SQLite connection pool
//!
//! Provides r2d2-based connection pooling for the relational store. Each
//! connection is initialized with WAL mode, enforced foreign keys, and a
//! busy timeout; the embedded schema is applied once at pool creation.

use std::path::Path;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use semester_domain::{Result, SemesterError};
use tracing::{debug, info, instrument};

use super::schema;
use crate::errors::InfraError;

/// Pool configuration
#[derive(Debug, Clone)]
pub struct SqlitePoolConfig {
    /// Maximum number of pooled connections
    pub max_size: u32,
    /// How long a caller waits for a free connection
    pub connection_timeout: Duration,
    /// SQLite busy timeout per connection, in milliseconds
    pub busy_timeout_ms: u32,
}

impl Default for SqlitePoolConfig {
    fn default() -> Self {
        Self {
            max_size: 10,
            connection_timeout: Duration::from_secs(5),
            busy_timeout_ms: 5_000,
        }
    }
}

/// SQLite connection pool
///
/// Writers serialize on SQLite's single write lock; the busy timeout keeps
/// short write bursts from surfacing as errors.
#[derive(Debug, Clone)]
pub struct SqlitePool {
    pool: Pool<SqliteConnectionManager>,
}

impl SqlitePool {
    /// Create a pool for the database at `path`, applying the schema.
    #[instrument(skip(config), fields(db_path = ?path, pool_size = config.max_size))]
    pub fn new(path: &Path, config: SqlitePoolConfig) -> Result<Self> {
        info!("creating sqlite connection pool");

        let busy_timeout_ms = config.busy_timeout_ms;
        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            conn.execute_batch(&format!(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = {busy_timeout_ms};"
            ))
        });

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .map_err(|e| {
                SemesterError::Database(format!("failed to create connection pool: {e}"))
            })?;

        {
            let conn = pool.get().map_err(InfraError::from)?;
            schema::apply(&conn)?;
            debug!("schema applied");
        }

        Ok(Self { pool })
    }

    /// Borrow a connection from the pool.
    pub fn get(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get().map_err(InfraError::from)?)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn pool_creates_schema_and_hands_out_connections() {
        let temp_dir = TempDir::new().unwrap();
        let pool =
            SqlitePool::new(&temp_dir.path().join("test.db"), SqlitePoolConfig::default()).unwrap();

        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let temp_dir = TempDir::new().unwrap();
        let pool =
            SqlitePool::new(&temp_dir.path().join("test.db"), SqlitePoolConfig::default()).unwrap();

        let conn = pool.get().unwrap();
        let result = conn.execute(
            "INSERT INTO work_hours (teacher_id, date, hours) VALUES (999, '2024-05-01', 2.0)",
            [],
        );
        assert!(result.is_err());
    }
}
