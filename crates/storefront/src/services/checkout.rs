//! Checkout: converting a session cart into order rows.
//!
//! Lines are submitted one at a time in cart order. The first failed insert
//! stops the batch; later lines are never attempted. What happens to the cart
//! afterwards is governed by [`ClearPolicy`]:
//!
//! - [`ClearPolicy::All`] empties the cart no matter how many lines were
//!   written, so a half-submitted cart can never be resubmitted. Lines after
//!   the failure are lost.
//! - [`ClearPolicy::Submitted`] removes only the lines that were written and
//!   leaves the rest in the cart for the shopper to retry.
//!
//! There is no transaction around the batch and no idempotency key; two
//! concurrent checkouts of the same session are prevented by the caller's
//! per-session lock, not here.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use estore_core::{Cart, OrderId, ProductId, UserId};

use super::CatalogReader;
use crate::db::{OrderStore, ProductStore};
use crate::models::NewOrder;

/// What to do with the cart after a checkout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClearPolicy {
    /// Always empty the cart.
    #[default]
    All,
    /// Remove only lines that were persisted.
    Submitted,
}

/// Error parsing a [`ClearPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected `all` or `submitted`, got {0:?}")]
pub struct ClearPolicyError(pub String);

impl FromStr for ClearPolicy {
    type Err = ClearPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "submitted" => Ok(Self::Submitted),
            _ => Err(ClearPolicyError(s.to_owned())),
        }
    }
}

impl fmt::Display for ClearPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Submitted => "submitted",
        })
    }
}

/// Outcome of [`OrderSubmitter::checkout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckoutResult {
    /// Order rows written.
    pub orders_submitted: usize,
    /// Whether every line was written.
    pub all_succeeded: bool,
    /// The line whose insert failed and stopped the batch.
    pub failed_product: Option<ProductId>,
}

/// Writes and retracts order rows.
#[derive(Debug, Clone)]
pub struct OrderSubmitter<O> {
    orders: O,
    policy: ClearPolicy,
}

impl<O: OrderStore> OrderSubmitter<O> {
    /// Submit orders to `orders`, clearing carts with [`ClearPolicy::All`].
    #[must_use]
    pub const fn new(orders: O) -> Self {
        Self {
            orders,
            policy: ClearPolicy::All,
        }
    }

    /// Use a different post-checkout clear policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ClearPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Persist one order row. Returns `false` on any storage failure.
    #[instrument(skip(self))]
    pub async fn submit_order(&self, order: &NewOrder) -> bool {
        match self.orders.insert(order).await {
            Ok(id) => {
                info!(order_id = %id, "order submitted");
                true
            }
            Err(e) => {
                error!(error = %e, "failed to submit order");
                false
            }
        }
    }

    /// Submit every cart line as an order for `user_id`, then clear the cart
    /// according to the configured policy.
    #[instrument(skip(self, cart), fields(lines = cart.len(), policy = %self.policy))]
    pub async fn checkout(&self, cart: &mut Cart, user_id: UserId) -> CheckoutResult {
        let mut submitted = 0;
        let mut failed_product = None;

        for line in cart.lines() {
            if !self.submit_order(&NewOrder::from_line(user_id, line)).await {
                failed_product = Some(line.product_id);
                break;
            }
            submitted += 1;
        }

        let unsubmitted = cart.len() - submitted;
        match self.policy {
            ClearPolicy::All => cart.clear(),
            ClearPolicy::Submitted => cart.discard_leading(submitted),
        }

        let result = CheckoutResult {
            orders_submitted: submitted,
            all_succeeded: failed_product.is_none(),
            failed_product,
        };

        if result.all_succeeded {
            info!(%user_id, submitted, "checkout complete");
        } else {
            warn!(
                %user_id,
                submitted,
                unsubmitted,
                kept_in_cart = cart.len(),
                "checkout stopped after a failed order"
            );
        }

        result
    }

    /// Order a single product directly, bypassing the cart.
    ///
    /// A quantity below 1 is treated as 1. Returns `false` without touching
    /// order storage if the product cannot be found.
    #[instrument(skip(self, catalog))]
    pub async fn buy_now<S: ProductStore>(
        &self,
        catalog: &CatalogReader<S>,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> bool {
        if catalog.get_product(product_id).await.is_none() {
            warn!(%product_id, "buy-now for unknown product");
            return false;
        }

        let order = NewOrder {
            user_id,
            product_id,
            quantity: quantity.max(1),
        };
        self.submit_order(&order).await
    }

    /// Delete an order. Failures and unknown ids are logged, never reported.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: OrderId) {
        match self.orders.delete(order_id).await {
            Ok(true) => info!(%order_id, "order cancelled"),
            Ok(false) => warn!(%order_id, "cancel requested for unknown order"),
            Err(e) => error!(%order_id, error = %e, "failed to cancel order"),
        }
    }

    /// Delete an order if it belongs to `user_id`, with the same
    /// fire-and-forget semantics as [`Self::cancel_order`].
    #[instrument(skip(self))]
    pub async fn cancel_user_order(&self, user_id: UserId, order_id: OrderId) {
        match self.orders.delete_for_user(user_id, order_id).await {
            Ok(true) => info!(%order_id, "order cancelled"),
            Ok(false) => warn!(%order_id, "cancel requested for unknown or foreign order"),
            Err(e) => error!(%order_id, error = %e, "failed to cancel order"),
        }
    }
}
