//! Database operations for the Curbside `PostgreSQL` database.
//!
//! # Database: `curbside`
//!
//! ## Tables
//!
//! Catalog (provisioned externally, read-only for this service):
//! - `businesses`, `domain_mappings`, `themes`
//! - `locations`, `parking_spots`
//! - `categories`, `products`
//! - `modifier_groups`, `modifier_options`, `product_modifier_groups`
//!
//! Orders (written by this service):
//! - `orders`, `order_items`, `order_item_modifiers`
//!
//! Sessions:
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p curbside-cli -- migrate
//! ```

pub mod catalog;
pub mod orders;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use catalog::CatalogRepository;
pub use orders::OrderRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or violates an invariant
    /// (e.g. a parking spot whose location chain is broken).
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
