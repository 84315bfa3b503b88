//! Database operations for the Tradepost `SQLite` store.
//!
//! ## Tables
//!
//! - `users` - Accounts and password hashes
//! - `products` - Catalog entries referenced by reviews
//! - `reviews` - One row per (product, user) pair
//! - `tower_sessions` - Session storage (owned by the session store)
//!
//! # Migrations
//!
//! Migrations are embedded from `crates/server/migrations/` via
//! [`sqlx::migrate!`] and run on startup.
//!
//! # Error mapping
//!
//! Repositories never expose `sqlx` error text for constraint handling:
//! unique violations are detected structurally via
//! [`sqlx::error::DatabaseError::is_unique_violation`] and surfaced as
//! [`RepositoryError::Conflict`], so layers above match on a typed signal.

pub mod products;
pub mod reviews;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use products::ProductRepository;
pub use reviews::ReviewRepository;
pub use users::UserRepository;

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// Foreign key enforcement is switched on explicitly; `SQLite` leaves it off
/// by default and the review table relies on it.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Map a sqlx error to [`RepositoryError::Conflict`] when it is a unique
/// constraint violation, passing everything else through as `Database`.
pub(crate) fn map_unique_violation(e: sqlx::Error, conflict: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(conflict.to_owned());
    }
    RepositoryError::Database(e)
}
