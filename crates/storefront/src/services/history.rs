//! Order history for the signed-in user.

use tracing::{error, instrument};

use estore_core::UserId;

use super::CatalogReader;
use crate::db::{OrderStore, ProductStore};
use crate::models::OrderView;

/// Joins a user's order rows with the current catalog.
#[derive(Debug, Clone)]
pub struct OrderHistory<O, S> {
    orders: O,
    catalog: CatalogReader<S>,
}

impl<O: OrderStore, S: ProductStore> OrderHistory<O, S> {
    /// Read orders from `orders` and product details through `catalog`.
    #[must_use]
    pub const fn new(orders: O, catalog: CatalogReader<S>) -> Self {
        Self { orders, catalog }
    }

    /// Every order placed by `user_id`, oldest first.
    ///
    /// Rows whose product has since disappeared are kept with no product
    /// details. A storage failure yields an empty history.
    #[instrument(skip(self))]
    pub async fn user_orders(&self, user_id: UserId) -> Vec<OrderView> {
        let orders = match self.orders.for_user(user_id).await {
            Ok(orders) => orders,
            Err(e) => {
                error!(%user_id, error = %e, "failed to load order history");
                return Vec::new();
            }
        };

        let mut views = Vec::with_capacity(orders.len());
        for order in orders {
            let product = self.catalog.get_product(order.product_id).await;
            views.push(OrderView::new(order, product));
        }
        views
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewOrder;
    use crate::testing::{InMemoryCatalog, InMemoryOrders, product};
    use estore_core::{Price, ProductId};
    use rust_decimal::Decimal;

    fn seed(orders: &InMemoryOrders, user: i32, product: i32, quantity: i32) {
        orders.seed(&NewOrder {
            user_id: UserId::new(user),
            product_id: ProductId::new(product),
            quantity,
        });
    }

    #[tokio::test]
    async fn test_user_orders_only_for_that_user() {
        let catalog = InMemoryCatalog::new([product(1, "Tee", "10.00"), product(2, "Mug", "4.50")]);
        let orders = InMemoryOrders::new();
        seed(&orders, 1, 1, 2);
        seed(&orders, 2, 2, 1);
        seed(&orders, 1, 2, 3);

        let history = OrderHistory::new(&orders, CatalogReader::new(&catalog));
        let views = history.user_orders(UserId::new(1)).await;

        let summary: Vec<_> = views
            .iter()
            .map(|v| (v.product_id.as_i32(), v.quantity, v.line_total))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, 2, Some(Price::new(Decimal::new(2000, 2)))),
                (2, 3, Some(Price::new(Decimal::new(1350, 2)))),
            ]
        );
    }

    #[tokio::test]
    async fn test_user_orders_keeps_rows_for_missing_products() {
        let catalog = InMemoryCatalog::new([product(1, "Tee", "10.00")]);
        let orders = InMemoryOrders::new();
        seed(&orders, 1, 42, 1);

        let views = OrderHistory::new(&orders, CatalogReader::new(&catalog))
            .user_orders(UserId::new(1))
            .await;

        assert_eq!(views.len(), 1);
        let view = views.first().expect("one view");
        assert_eq!(view.product_id, ProductId::new(42));
        assert!(view.product.is_none());
        assert!(view.line_total.is_none());
    }

    #[tokio::test]
    async fn test_user_orders_storage_failure_is_empty() {
        let catalog = InMemoryCatalog::default();
        let orders = InMemoryOrders::new();
        seed(&orders, 1, 1, 1);
        orders.set_failing(true);

        let views = OrderHistory::new(&orders, CatalogReader::new(&catalog))
            .user_orders(UserId::new(1))
            .await;
        assert!(views.is_empty());
    }

    #[tokio::test]
    async fn test_user_orders_no_orders() {
        let catalog = InMemoryCatalog::default();
        let orders = InMemoryOrders::new();

        let views = OrderHistory::new(&orders, CatalogReader::new(&catalog))
            .user_orders(UserId::new(5))
            .await;
        assert!(views.is_empty());
        assert_eq!(catalog.calls(), 0);
    }
}
