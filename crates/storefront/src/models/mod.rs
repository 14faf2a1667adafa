//! Domain models for the storefront.
//!
//! These are validated domain objects, separate from the `FromRow` structs in
//! [`crate::db`]. Products and users are owned by storage; the storefront only
//! ever holds transient copies.

pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use order::{NewOrder, Order, OrderView, ProductSummary};
pub use product::Product;
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
