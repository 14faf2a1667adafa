//! estore storefront library.
//!
//! Session cart, checkout and order history over `PostgreSQL`, served as a
//! JSON API. The binary in `main.rs` is a thin composition root over this
//! crate so the workflows can be tested without a server.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
