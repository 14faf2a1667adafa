//! Catalog reads.
//!
//! Storage failures never reach the caller: listing degrades to an empty
//! catalog and single lookups to `None`, with the error logged.

use tracing::{debug, error, instrument};

use estore_core::ProductId;

use crate::db::ProductStore;
use crate::models::Product;

/// Read-only view of the product catalog.
#[derive(Debug, Clone)]
pub struct CatalogReader<S> {
    store: S,
}

impl<S: ProductStore> CatalogReader<S> {
    /// Wrap a product store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// All products in storage order. Empty if storage fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Vec<Product> {
        match self.store.all().await {
            Ok(products) => products,
            Err(e) => {
                error!(error = %e, "failed to list products");
                Vec::new()
            }
        }
    }

    /// Look up one product.
    ///
    /// Ids that are not positive are rejected without a storage round trip.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Option<Product> {
        if !id.is_positive() {
            debug!(%id, "rejecting non-positive product id");
            return None;
        }

        match self.store.find(id).await {
            Ok(product) => product,
            Err(e) => {
                error!(%id, error = %e, "failed to fetch product");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryCatalog, product};

    #[tokio::test]
    async fn test_list_products_in_storage_order() {
        let store = InMemoryCatalog::new([product(2, "Mug", "8.00"), product(1, "Tee", "15.00")]);
        let catalog = CatalogReader::new(&store);

        let ids: Vec<_> = catalog
            .list_products()
            .await
            .into_iter()
            .map(|p| p.id.as_i32())
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_list_products_degrades_to_empty() {
        let store = InMemoryCatalog::new([product(1, "Tee", "15.00")]);
        store.set_failing(true);

        assert!(CatalogReader::new(&store).list_products().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_products_empty_catalog() {
        let store = InMemoryCatalog::default();
        assert!(CatalogReader::new(&store).list_products().await.is_empty());
    }

    #[tokio::test]
    async fn test_get_product() {
        let store = InMemoryCatalog::new([product(101, "Laptop", "999.99")]);
        let catalog = CatalogReader::new(&store);

        let found = catalog.get_product(ProductId::new(101)).await;
        assert_eq!(found.map(|p| p.name), Some("Laptop".to_owned()));
        assert!(catalog.get_product(ProductId::new(5)).await.is_none());
    }

    #[tokio::test]
    async fn test_get_product_rejects_non_positive_without_storage() {
        let store = InMemoryCatalog::new([product(1, "Tee", "15.00")]);
        let catalog = CatalogReader::new(&store);

        assert!(catalog.get_product(ProductId::new(0)).await.is_none());
        assert!(catalog.get_product(ProductId::new(-1)).await.is_none());
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_get_product_degrades_to_none() {
        let store = InMemoryCatalog::new([product(1, "Tee", "15.00")]);
        store.set_failing(true);

        assert!(
            CatalogReader::new(&store)
                .get_product(ProductId::new(1))
                .await
                .is_none()
        );
        assert_eq!(store.calls(), 1);
    }
}
