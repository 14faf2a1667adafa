//! Order domain types.
//!
//! One order row is one former cart line. What a shopper thinks of as "an
//! order" is the set of rows written by a single checkout.

use chrono::{DateTime, Utc};
use serde::Serialize;

use estore_core::{CartLine, OrderId, Price, ProductId, UserId};

use super::Product;

/// An order waiting to be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrder {
    /// Purchasing user.
    pub user_id: UserId,
    /// Product ordered.
    pub product_id: ProductId,
    /// Units ordered.
    pub quantity: i32,
}

impl NewOrder {
    /// Build the order for one cart line.
    #[must_use]
    pub const fn from_line(user_id: UserId, line: &CartLine) -> Self {
        Self {
            user_id,
            product_id: line.product_id,
            quantity: line.quantity,
        }
    }
}

/// A persisted order row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Storage-assigned id.
    pub id: OrderId,
    /// Purchasing user.
    pub user_id: UserId,
    /// Product ordered.
    pub product_id: ProductId,
    /// Units ordered.
    pub quantity: i32,
    /// Insert timestamp assigned by storage.
    pub created_at: DateTime<Utc>,
}

/// Display fields of the product an order refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSummary {
    pub name: String,
    pub category: String,
    /// Current unit price, not the price at purchase time.
    pub price: Price,
}

impl From<Product> for ProductSummary {
    fn from(product: Product) -> Self {
        Self {
            name: product.name,
            category: product.category,
            price: product.price,
        }
    }
}

/// An order row enriched with catalog data for the history page.
///
/// `product` and `line_total` are `None` when the product no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderView {
    /// Order row id, used to cancel it.
    pub id: OrderId,
    /// Ordered product, present even when the product is gone.
    pub product_id: ProductId,
    /// Quantity as ordered.
    pub quantity: i32,
    /// When the row was written.
    pub created_at: DateTime<Utc>,
    /// Current catalog details.
    pub product: Option<ProductSummary>,
    /// Current price times the ordered quantity.
    pub line_total: Option<Price>,
}

impl OrderView {
    /// Join an order with its (possibly missing) product.
    #[must_use]
    pub fn new(order: Order, product: Option<Product>) -> Self {
        let line_total = product.as_ref().map(|p| p.price.times(order.quantity));
        Self {
            id: order.id,
            product_id: order.product_id,
            quantity: order.quantity,
            created_at: order.created_at,
            product: product.map(ProductSummary::from),
            line_total,
        }
    }
}
