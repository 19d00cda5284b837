//! Database layer - connection pool, schema and repositories
//!
//! Repositories borrow a `&mut SqliteConnection`, so the same repo code runs
//! against a pooled connection or inside a transaction. Uniqueness is left to
//! the schema; conflicts surface as `DbError::Conflict`.

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_memory_pool, create_pool, create_pool_with_options};
pub use repos::*;

use sqlx::SqlitePool;

/// Open a migrated in-memory database.
pub async fn connect_memory() -> Result<SqlitePool, sqlx::Error> {
    let pool = create_memory_pool().await?;
    migrations::run(&pool).await?;
    Ok(pool)
}
