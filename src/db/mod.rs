//! Database subsystem.
//!
//! # Data Flow
//! ```text
//! Bootstrap:
//!     Database::new() → shared handle (pool not yet connected)
//!     supervised task → Database::connect() → schema → pool published
//!
//! Request path:
//!     handler → Database::pool() → Some(pool) → queries.rs
//!                               → None → 503 (connect still pending/failed)
//! ```
//!
//! # Design Decisions
//! - Connection is fire-and-forget from the bootstrap's point of view; the
//!   API degrades to 503 instead of blocking startup on the database
//! - SQLite with WAL; timestamps stored as epoch milliseconds
//! - Duplicate jobs are keyed by URL and silently ignored on insert

pub mod models;
pub mod queries;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::config::DatabaseConfig;

pub use models::{Job, NewJob, Subscriber};

/// Database error type.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("subscriber email already registered")]
    DuplicateEmail,
}

/// Shared database handle.
///
/// Created unconnected; `connect` publishes the pool once it succeeds.
/// Callers that need the pool before then observe `None`.
pub struct Database {
    pool: OnceCell<SqlitePool>,
}

impl Database {
    pub fn new() -> Self {
        Self {
            pool: OnceCell::new(),
        }
    }

    /// Connect, create the schema, and publish the pool.
    pub async fn connect(&self, config: &DatabaseConfig) -> Result<(), DbError> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;
        create_schema(&pool).await?;

        tracing::info!(url = %config.url, "Database connected");

        // Lost race means another connect already published a pool; the
        // extra one is simply dropped.
        let _ = self.pool.set(pool);
        Ok(())
    }

    /// The connected pool, or `None` while connection is pending or failed.
    pub fn pool(&self) -> Option<&SqlitePool> {
        self.pool.get()
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) async fn create_schema(pool: &SqlitePool) -> Result<(), DbError> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS jobs (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            company TEXT NOT NULL,
            url TEXT NOT NULL UNIQUE,
            source TEXT NOT NULL,
            posted_at INTEGER NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS subscribers (
            id INTEGER PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            keywords TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 1,
            created_at INTEGER NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}
