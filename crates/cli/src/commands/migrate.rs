//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! wp-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `WISHLIST_DATABASE_URL` - `SQLite` connection string (fallback `DATABASE_URL`,
//!   default `sqlite://wishlist.db?mode=rwc`)
//!
//! Migration files live in `crates/server/migrations/` and are embedded in
//! the server library at build time.

use thiserror::Error;
use wishlist_proxy_server::config::database_url_from_env;
use wishlist_proxy_server::db;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run the wishlist database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database cannot be opened or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let _ = dotenvy::dotenv();

    tracing::info!("Connecting to wishlist database...");
    let pool = db::create_pool(&database_url_from_env(), 1).await?;

    tracing::info!("Running wishlist migrations...");
    db::run_migrations(&pool).await?;
    pool.close().await;

    tracing::info!("Wishlist migrations complete!");
    Ok(())
}
