//! Catalog product.

use serde::{Deserialize, Serialize};

use estore_core::{Price, ProductId};

/// A product row from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog id.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Free-form category label.
    pub category: String,
    /// Current unit price (non-negative).
    pub price: Price,
    /// Opaque image reference, usually a path under the static assets.
    pub image: String,
}
