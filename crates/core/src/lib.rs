//! estore core - domain types shared by every estore crate.
//!
//! Used by:
//! - `estore-storefront` - HTTP service, storage access, checkout
//! - `estore-cli` - Migrations, catalog seeding, user management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no database access,
//! no HTTP. The session cart lives here because every cart transition is a
//! pure function of the cart and a product id.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, and emails
//! - [`cart`] - The per-session cart and its mutation protocol

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartAction, CartActionError, CartLine, CartUpdate, LineChange};
pub use types::*;
