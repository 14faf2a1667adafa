//! Product repository for catalog reads.
//!
//! Rows are decoded through [`ProductRow`] by column name, so a schema drift
//! surfaces as an explicit `ColumnNotFound` error rather than a silent default.

use sqlx::{FromRow, PgPool};

use estore_core::{Price, ProductId};

use super::{ProductStore, RepositoryError};
use crate::models::Product;

/// Fixed-schema row of the `products` table.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    category: String,
    price: Price,
    image: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category: row.category,
            price: row.price,
            image: row.image,
        }
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a product and return its id. Used by the seeding CLI.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        category: &str,
        price: Price,
        image: &str,
    ) -> Result<ProductId, RepositoryError> {
        let id: ProductId = sqlx::query_scalar(
            r"
            INSERT INTO products (name, category, price, image)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(name)
        .bind(category)
        .bind(price)
        .bind(image)
        .fetch_one(self.pool)
        .await?;

        Ok(id)
    }
}

impl ProductStore for ProductRepository<'_> {
    async fn all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r"
            SELECT id, name, category, price, image
            FROM products
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        // ids are unique, so the first row is the only row
        let row: Option<ProductRow> = sqlx::query_as(
            r"
            SELECT id, name, category, price, image
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }
}
