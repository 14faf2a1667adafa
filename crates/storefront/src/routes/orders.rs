//! Order route handlers. All of them require a signed-in user.

use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use estore_core::{OrderId, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::OrderView;
use crate::state::AppState;

/// Buy-now form data.
#[derive(Debug, Deserialize)]
pub struct BuyNowForm {
    pub id: i32,
    /// Missing or below 1 means one unit.
    #[serde(default)]
    pub quantity: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct BuyNowResponse {
    pub submitted: bool,
}

/// The signed-in user's order history.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Json<Vec<OrderView>> {
    Json(state.history().user_orders(user.id).await)
}

/// Order one product directly, leaving the cart untouched.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn buy_now(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<BuyNowForm>,
) -> Result<Json<BuyNowResponse>> {
    let product_id = ProductId::new(form.id);
    if !product_id.is_positive() {
        return Err(AppError::BadRequest("product id must be positive".to_string()));
    }

    let catalog = state.catalog();
    let submitted = state
        .orders()
        .buy_now(&catalog, user.id, product_id, form.quantity.unwrap_or(1))
        .await;

    Ok(Json(BuyNowResponse { submitted }))
}

/// Cancel one of the user's orders.
///
/// Always answers `204`: unknown ids, other users' orders and storage
/// failures are logged, not reported.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> StatusCode {
    state
        .orders()
        .cancel_user_order(user.id, OrderId::new(id))
        .await;
    StatusCode::NO_CONTENT
}
