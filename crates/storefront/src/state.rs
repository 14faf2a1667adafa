//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::{OrderRepository, ProductRepository};
use crate::middleware::SessionLocks;
use crate::services::{CatalogReader, OrderHistory, OrderSubmitter, PricingAggregator};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Services are built per call from the pool;
/// they borrow it and hold no other state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    session_locks: SessionLocks,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                session_locks: SessionLocks::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Per-session request locks.
    #[must_use]
    pub fn session_locks(&self) -> &SessionLocks {
        &self.inner.session_locks
    }

    #[must_use]
    pub fn catalog(&self) -> CatalogReader<ProductRepository<'_>> {
        CatalogReader::new(ProductRepository::new(self.pool()))
    }

    #[must_use]
    pub fn pricing(&self) -> PricingAggregator<ProductRepository<'_>> {
        PricingAggregator::new(self.catalog())
    }

    /// Order submitter using the configured clear policy.
    #[must_use]
    pub fn orders(&self) -> OrderSubmitter<OrderRepository<'_>> {
        OrderSubmitter::new(OrderRepository::new(self.pool())).with_policy(self.config().clear_policy)
    }

    #[must_use]
    pub fn history(&self) -> OrderHistory<OrderRepository<'_>, ProductRepository<'_>> {
        OrderHistory::new(OrderRepository::new(self.pool()), self.catalog())
    }
}
