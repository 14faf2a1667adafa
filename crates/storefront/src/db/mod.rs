//! Database operations for the storefront `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `products` - Catalog (read-only to the storefront)
//! - `users` - Shoppers and their password hashes
//! - `orders` - One row per checked-out cart line
//! - `tower_sessions.session` - Tower-sessions storage (carts live here)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p estore-cli -- migrate
//! ```
//!
//! # Storage seams
//!
//! Services depend on [`ProductStore`] and [`OrderStore`] rather than on the
//! concrete repositories, so the checkout workflow can be exercised without a
//! database (see `crate::testing`).

pub mod orders;
pub mod products;
pub mod users;

use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use estore_core::{OrderId, ProductId, UserId};

use crate::models::{NewOrder, Order, Product};

pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx (connectivity, constraint, decode).
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Read access to the product catalog.
pub trait ProductStore: Send + Sync {
    /// Every product, in storage order.
    fn all(&self) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send;

    /// The product with this id, if any.
    fn find(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, RepositoryError>> + Send;
}

/// Persistence for order rows.
pub trait OrderStore: Send + Sync {
    /// Insert one order row and return its id.
    fn insert(
        &self,
        order: &NewOrder,
    ) -> impl Future<Output = Result<OrderId, RepositoryError>> + Send;

    /// All orders for a user, in storage order.
    fn for_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Order>, RepositoryError>> + Send;

    /// Delete an order. Returns whether a row was deleted.
    fn delete(&self, id: OrderId) -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    /// Delete an order only if it belongs to `user_id`.
    fn delete_for_user(
        &self,
        user_id: UserId,
        id: OrderId,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;
}

impl<T: ProductStore + ?Sized> ProductStore for &T {
    fn all(&self) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send {
        (**self).all()
    }

    fn find(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, RepositoryError>> + Send {
        (**self).find(id)
    }
}

impl<T: OrderStore + ?Sized> OrderStore for &T {
    fn insert(
        &self,
        order: &NewOrder,
    ) -> impl Future<Output = Result<OrderId, RepositoryError>> + Send {
        (**self).insert(order)
    }

    fn for_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Order>, RepositoryError>> + Send {
        (**self).for_user(user_id)
    }

    fn delete(&self, id: OrderId) -> impl Future<Output = Result<bool, RepositoryError>> + Send {
        (**self).delete(id)
    }

    fn delete_for_user(
        &self,
        user_id: UserId,
        id: OrderId,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send {
        (**self).delete_for_user(user_id, id)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(2.min(max_connections))
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
