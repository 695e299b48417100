use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;

use crate::error::{AppError, Result};

/// Type alias for the shared SQLite connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Build the r2d2 connection pool for the given database URL (a file path,
/// or `:memory:` in tests). Schema creation is the store's job; this only
/// owns connection lifecycle.
pub fn init_db_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .build(manager)
        .map_err(|e| AppError::storage(format!("failed to create database pool: {}", e)))
}
