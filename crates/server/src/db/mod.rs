//! Database operations for the wishlist `SQLite` store.
//!
//! ## Tables
//!
//! - `wishlist_item` - One row per (shop, customer, product, variant) favorite,
//!   unique on that tuple
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and embedded at build
//! time. They run via:
//! ```bash
//! cargo run -p wishlist-proxy-cli -- migrate
//! ```
//! or at server startup when `WISHLIST_AUTO_MIGRATE=true`.

pub mod wishlist;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::migrate::MigrateError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use wishlist::WishlistRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `SQLite` connection pool.
///
/// The database file is created if missing. WAL journaling lets readers
/// proceed while a write is in flight, and the busy timeout makes concurrent
/// writers queue inside `SQLite` instead of failing with `SQLITE_BUSY`.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the database cannot be opened.
pub async fn create_pool(
    database_url: &SecretString,
    max_connections: u32,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create a private in-memory database.
///
/// Every `SQLite` connection to `:memory:` opens a separate database, so the
/// pool is pinned to a single connection that is never recycled.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be opened.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
        .await
}

/// Apply the embedded migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the applied history
/// diverges from the embedded set.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
