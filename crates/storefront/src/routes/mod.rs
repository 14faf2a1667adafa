//! HTTP route handlers for the storefront.
//!
//! Every response body is JSON.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness
//! GET  /health/ready           - Database readiness
//!
//! # Products
//! GET  /products               - Product listing
//! GET  /products/{id}          - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart lines with live prices and total
//! GET  /cart/{action}/{id}     - add | inc | dec | remove
//! POST /cart/checkout          - Submit the cart as orders (requires auth)
//!
//! # Orders (requires auth)
//! GET  /orders                 - Order history
//! POST /orders/buy-now         - Order one product directly
//! POST /orders/{id}/cancel     - Cancel an order
//!
//! # Auth
//! POST /auth/login             - Login action
//! POST /auth/logout            - Logout action
//! ```

pub mod auth;
pub mod cart;
pub mod health;
pub mod orders;
pub mod products;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::middleware::{request_id_middleware, session_lock_middleware};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/checkout", post(cart::checkout))
        .route("/{action}/{id}", get(cart::update))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/buy-now", post(orders::buy_now))
        .route("/{id}/cancel", post(orders::cancel))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .nest("/auth", auth_routes())
}

/// The application with sessions: `sessions` wrapped in the per-session lock.
///
/// `main` passes the `PostgreSQL` layer and adds Sentry on top; tests pass a
/// `MemoryStore` layer. The layer must use [`SESSION_COOKIE_NAME`], which is
/// what the lock reads.
///
/// [`SESSION_COOKIE_NAME`]: crate::middleware::SESSION_COOKIE_NAME
pub fn app<Store>(state: AppState, sessions: SessionManagerLayer<Store>) -> Router
where
    Store: SessionStore + Clone,
{
    let locks = state.session_locks().clone();
    router(state)
        .layer(sessions)
        .layer(from_fn_with_state(locks, session_lock_middleware))
}

/// Routes, request ids and tracing, without the session layers.
fn router(state: AppState) -> Router {
    routes()
        .with_state(state)
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &axum::extract::Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
}
