//! SQLite storage: connection pool and embedded schema

pub mod pool;
pub mod schema;

pub use pool::{SqlitePool, SqlitePoolConfig};
