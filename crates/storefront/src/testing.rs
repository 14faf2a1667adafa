//! In-memory storage for tests.
//!
//! Available to this crate's unit tests and, through the `test-utils` feature,
//! to other crates. Both stores count calls so tests can assert that a code
//! path never reached storage, and both can be told to fail.

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use rust_decimal::Decimal;

use estore_core::{OrderId, Price, ProductId, UserId};

use crate::db::{OrderStore, ProductStore, RepositoryError};
use crate::models::{NewOrder, Order, Product};

/// Build a product with a decimal price given as a string, e.g. `"19.99"`.
///
/// # Panics
///
/// Panics if `price` is not a valid decimal.
#[must_use]
pub fn product(id: i32, name: &str, price: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        category: "General".to_owned(),
        price: Price::new(Decimal::from_str(price).expect("valid decimal price")),
        image: format!("{id}.jpg"),
    }
}

fn storage_failure() -> RepositoryError {
    RepositoryError::Database(sqlx::Error::PoolTimedOut)
}

/// A [`ProductStore`] over a fixed list of products.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl InMemoryCatalog {
    /// Create a catalog holding `products`.
    #[must_use]
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: products.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Make every call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of calls made against this store.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<(), RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(storage_failure());
        }
        Ok(())
    }
}

impl ProductStore for InMemoryCatalog {
    async fn all(&self) -> Result<Vec<Product>, RepositoryError> {
        self.begin()?;
        Ok(self.products.clone())
    }

    async fn find(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        self.begin()?;
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }
}

/// An [`OrderStore`] backed by a vector.
#[derive(Debug)]
pub struct InMemoryOrders {
    rows: Mutex<Vec<Order>>,
    next_id: AtomicI32,
    insert_attempts: AtomicUsize,
    fail_inserts_from: AtomicUsize,
    failing: AtomicBool,
}

impl Default for InMemoryOrders {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(1),
            insert_attempts: AtomicUsize::new(0),
            fail_inserts_from: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }
}

impl InMemoryOrders {
    /// Create an empty order store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `attempt`-th insert (1-based) and every later one fail.
    pub fn fail_inserts_from(&self, attempt: usize) {
        self.fail_inserts_from.store(attempt, Ordering::SeqCst);
    }

    /// Make every call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of inserts attempted, successful or not.
    #[must_use]
    pub fn insert_attempts(&self) -> usize {
        self.insert_attempts.load(Ordering::SeqCst)
    }

    /// Snapshot of persisted rows.
    #[must_use]
    pub fn rows(&self) -> Vec<Order> {
        self.lock().clone()
    }

    /// Persist a row directly, bypassing failure injection.
    pub fn seed(&self, order: &NewOrder) -> OrderId {
        let id = OrderId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.lock().push(Order {
            id,
            user_id: order.user_id,
            product_id: order.product_id,
            quantity: order.quantity,
            created_at: Utc::now(),
        });
        id
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Order>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(storage_failure());
        }
        Ok(())
    }
}

impl OrderStore for InMemoryOrders {
    async fn insert(&self, order: &NewOrder) -> Result<OrderId, RepositoryError> {
        let attempt = self.insert_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        self.check()?;

        let threshold = self.fail_inserts_from.load(Ordering::SeqCst);
        if threshold != 0 && attempt >= threshold {
            return Err(storage_failure());
        }

        Ok(self.seed(order))
    }

    async fn for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        self.check()?;
        Ok(self
            .lock()
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        self.check()?;
        let mut rows = self.lock();
        let before = rows.len();
        rows.retain(|o| o.id != id);
        Ok(rows.len() != before)
    }

    async fn delete_for_user(&self, user_id: UserId, id: OrderId) -> Result<bool, RepositoryError> {
        self.check()?;
        let mut rows = self.lock();
        let before = rows.len();
        rows.retain(|o| !(o.id == id && o.user_id == user_id));
        Ok(rows.len() != before)
    }
}
