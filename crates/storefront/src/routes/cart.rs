//! Cart route handlers.
//!
//! The cart lives in the session under [`session_keys::CART`]. Requests for
//! one session are serialized by
//! [`session_lock_middleware`](crate::middleware::session_lock_middleware)
//! until the session is saved, so a read-modify-write here cannot lose updates.

use axum::{
    Json,
    extract::{Path, State},
};
use tower_sessions::Session;
use tracing::{info, instrument};

use estore_core::{Cart, CartAction, CartUpdate, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::models::session_keys;
use crate::services::{CartSummary, CheckoutResult};
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the session cart, or an empty one if none has been stored yet.
pub(crate) async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Write the cart back to the session.
pub(crate) async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the cart with live prices.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartSummary>> {
    let cart = load_cart(&session).await?;
    Ok(Json(state.pricing().summarize(&cart).await))
}

/// Apply `add`, `inc`, `dec`, or `remove` to one product.
///
/// Unknown actions and non-positive ids are rejected before the cart is read.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Path((action, id)): Path<(String, i32)>,
) -> Result<Json<CartUpdate>> {
    let action: CartAction = action
        .parse()
        .map_err(|e: estore_core::CartActionError| AppError::BadRequest(e.to_string()))?;
    let product_id = ProductId::new(id);
    if !product_id.is_positive() {
        return Err(AppError::BadRequest("product id must be positive".to_string()));
    }

    let mut cart = load_cart(&session).await?;
    let update = cart.apply(action, product_id);
    if update.change.is_modified() {
        save_cart(&session, &cart).await?;
    }

    add_breadcrumb(
        "cart",
        action.as_str(),
        &[("product_id", product_id.to_string())],
    );

    Ok(Json(update))
}

/// Submit every cart line as an order for the signed-in user.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CheckoutResult>> {
    let mut cart = load_cart(&session).await?;
    let result = state.orders().checkout(&mut cart, user.id).await;
    save_cart(&session, &cart).await?;

    info!(
        submitted = result.orders_submitted,
        all_succeeded = result.all_succeeded,
        "checkout finished"
    );

    Ok(Json(result))
}
