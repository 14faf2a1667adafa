//! Cart pricing against live catalog prices.
//!
//! Nothing here is cached: every call re-reads prices, so a cart page always
//! reflects the current catalog. Lines whose product cannot be resolved are
//! left out of the display and contribute nothing to the total.

use serde::Serialize;
use tracing::{debug, instrument};

use estore_core::{Cart, Price, ProductId};

use super::CatalogReader;
use crate::db::ProductStore;

/// A cart line joined with its product, for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLine {
    /// The cart line's product.
    pub product_id: ProductId,
    /// Product name at pricing time.
    pub name: String,
    /// Product category at pricing time.
    pub category: String,
    /// Quantity as stored in the cart.
    pub quantity: i32,
    /// Current catalog price.
    pub unit_price: Price,
    /// `unit_price × quantity`, quantity taken as stored.
    pub line_total: Price,
}

/// Everything the cart page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    /// Lines whose product resolved, in cart order.
    pub lines: Vec<ResolvedLine>,
    /// Sum of the resolved line totals.
    pub total: Price,
    /// Total quantity across every cart line, resolved or not.
    pub item_count: i64,
}

/// Computes line and cart totals for a cart snapshot.
#[derive(Debug, Clone)]
pub struct PricingAggregator<S> {
    catalog: CatalogReader<S>,
}

impl<S: ProductStore> PricingAggregator<S> {
    /// Price carts against `catalog`.
    #[must_use]
    pub const fn new(catalog: CatalogReader<S>) -> Self {
        Self { catalog }
    }

    /// Resolve each line in cart order, dropping lines whose product is gone.
    #[instrument(skip_all, fields(lines = cart.len()))]
    pub async fn resolve_cart_lines(&self, cart: &Cart) -> Vec<ResolvedLine> {
        let mut resolved = Vec::with_capacity(cart.len());
        for line in cart {
            let Some(product) = self.catalog.get_product(line.product_id).await else {
                debug!(product_id = %line.product_id, "dropping unresolvable cart line");
                continue;
            };
            resolved.push(ResolvedLine {
                product_id: product.id,
                line_total: product.price.times(line.quantity),
                unit_price: product.price,
                name: product.name,
                category: product.category,
                quantity: line.quantity,
            });
        }
        resolved
    }

    /// Sum of `price × quantity` over resolvable lines; zero for an empty cart.
    #[instrument(skip_all, fields(lines = cart.len()))]
    pub async fn total_price(&self, cart: &Cart) -> Price {
        let mut total = Price::zero();
        for line in cart {
            if let Some(product) = self.catalog.get_product(line.product_id).await {
                total = total + product.price.times(line.quantity);
            }
        }
        total
    }

    /// Resolved lines plus their total in one pass over the catalog.
    pub async fn summarize(&self, cart: &Cart) -> CartSummary {
        let lines = self.resolve_cart_lines(cart).await;
        let total = lines.iter().map(|line| line.line_total).sum();
        CartSummary {
            lines,
            total,
            item_count: cart.total_quantity(),
        }
    }
}
