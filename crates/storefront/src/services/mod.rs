//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `catalog` - Product reads with the degrade-to-empty failure policy
//! - `pricing` - Resolves cart lines against live prices and totals them
//! - `checkout` - Turns a cart into order rows; cancellation; buy-now
//! - `history` - A user's orders joined with catalog data
//! - `auth` - Password login for the session identity
//!
//! None of the cart/order services return errors: storage failures are logged
//! through `tracing` and surface as empty results, `None`, or `false`.

pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod history;
pub mod pricing;

pub use catalog::CatalogReader;
pub use checkout::{CheckoutResult, ClearPolicy, ClearPolicyError, OrderSubmitter};
pub use history::OrderHistory;
pub use pricing::{CartSummary, PricingAggregator, ResolvedLine};
