//! Session-scoped shopping cart.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s, at most one per product.
//! Uniqueness is maintained by the mutation methods and by [`Cart::from_lines`],
//! which keeps the first line it sees for each product. Quantities are *not*
//! validated: the mutation methods never produce a quantity below 1, but a cart
//! restored from storage may carry any value and consumers treat it literally.
//!
//! ```text
//!   add(p, q) ──► [.., (p, q)]        (no-op if p already present)
//!   increment(p)  (p, q) ──► (p, q+1)
//!   decrement(p)  (p, q) ──► (p, q-1)  or removed when q-1 < 1
//!   remove(p)     (p, _) ──► removed
//!   clear()       [..]   ──► []
//! ```
//!
//! Carts are not synchronized. Callers hold one cart per session and
//! serialize access to it themselves.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ProductId;

/// One entry in a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Units requested. Intended to be at least 1; not enforced here.
    pub quantity: i32,
}

impl CartLine {
    /// Create a line.
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: i32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// An ordered, unique-by-product collection of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from existing lines, keeping the first line per product.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            if !cart.contains(line.product_id) {
                cart.lines.push(line);
            }
        }
        cart
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether a line exists for `product_id`.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.position(product_id).is_some()
    }

    /// Quantity on the line for `product_id`, if present.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> Option<i32> {
        self.lines
            .iter()
            .find(|line| line.product_id == product_id)
            .map(|line| line.quantity)
    }

    /// Sum of all line quantities, as stored.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|line| i64::from(line.quantity)).sum()
    }

    /// Append a line for `product_id`.
    ///
    /// Returns `false` and leaves the cart untouched if the product is already
    /// present; adding never merges quantities.
    pub fn add(&mut self, product_id: ProductId, quantity: i32) -> bool {
        if self.contains(product_id) {
            return false;
        }
        self.lines.push(CartLine::new(product_id, quantity));
        true
    }

    /// Increase the line's quantity by one, returning the new quantity.
    ///
    /// `None` if the product is not in the cart.
    pub fn increment(&mut self, product_id: ProductId) -> Option<i32> {
        let line = self.line_mut(product_id)?;
        line.quantity = line.quantity.saturating_add(1);
        Some(line.quantity)
    }

    /// Decrease the line's quantity by one.
    ///
    /// A line that would drop below 1 is removed instead and `Some(0)` is
    /// returned. `None` if the product is not in the cart.
    pub fn decrement(&mut self, product_id: ProductId) -> Option<i32> {
        let index = self.position(product_id)?;
        let quantity = self.lines.get(index)?.quantity.saturating_sub(1);
        if quantity < 1 {
            self.lines.remove(index);
            return Some(0);
        }
        if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity;
        }
        Some(quantity)
    }

    /// Remove the line for `product_id` regardless of quantity.
    ///
    /// Returns whether a line was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        match self.position(product_id) {
            Some(index) => {
                self.lines.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Drop the first `count` lines, keeping the rest in order.
    pub fn discard_leading(&mut self, count: usize) {
        let count = count.min(self.lines.len());
        self.lines.drain(..count);
    }

    /// Apply a shopper action and describe the result.
    ///
    /// [`CartAction::Add`] always adds a single unit.
    pub fn apply(&mut self, action: CartAction, product_id: ProductId) -> CartUpdate {
        let change = match action {
            CartAction::Add => {
                if self.add(product_id, 1) {
                    LineChange::Added { quantity: 1 }
                } else {
                    LineChange::AlreadyInCart
                }
            }
            CartAction::Increment => self
                .increment(product_id)
                .map_or(LineChange::NotInCart, |quantity| LineChange::Quantity { quantity }),
            CartAction::Decrement => match self.decrement(product_id) {
                Some(0) => LineChange::Removed,
                Some(quantity) => LineChange::Quantity { quantity },
                None => LineChange::NotInCart,
            },
            CartAction::Remove => {
                if self.remove(product_id) {
                    LineChange::Removed
                } else {
                    LineChange::NotInCart
                }
            }
        };

        CartUpdate {
            product_id,
            change,
            cart_empty: self.is_empty(),
        }
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product_id == product_id)
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Self::from_lines(lines)
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLine;
    type IntoIter = core::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// A cart mutation verb as sent by the storefront (`add`, `inc`, `dec`, `remove`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CartAction {
    /// Add one unit of a product not yet in the cart.
    #[serde(rename = "add")]
    Add,
    /// Increase quantity by one.
    #[serde(rename = "inc")]
    Increment,
    /// Decrease quantity by one, removing the line at zero.
    #[serde(rename = "dec")]
    Decrement,
    /// Remove the line.
    #[serde(rename = "remove")]
    Remove,
}

impl CartAction {
    /// The wire verb for this action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Increment => "inc",
            Self::Decrement => "dec",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for CartAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`CartAction`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown cart action: {0:?}")]
pub struct CartActionError(pub String);

impl FromStr for CartAction {
    type Err = CartActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "inc" => Ok(Self::Increment),
            "dec" => Ok(Self::Decrement),
            "remove" => Ok(Self::Remove),
            other => Err(CartActionError(other.to_owned())),
        }
    }
}

/// What happened to a line after [`Cart::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineChange {
    /// A new line was appended.
    Added {
        /// Quantity of the new line.
        quantity: i32,
    },
    /// The product was already in the cart; nothing changed.
    AlreadyInCart,
    /// The line's quantity changed.
    Quantity {
        /// Quantity after the change.
        quantity: i32,
    },
    /// The line was removed.
    Removed,
    /// The product was not in the cart; nothing changed.
    NotInCart,
}

impl LineChange {
    /// Whether the cart was modified.
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        !matches!(self, Self::AlreadyInCart | Self::NotInCart)
    }
}

/// Result of a cart action, reported back to the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartUpdate {
    /// Product the action targeted.
    pub product_id: ProductId,
    /// Effect on that product's line.
    pub change: LineChange,
    /// Whether the cart is empty afterwards.
    pub cart_empty: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pid(id: i32) -> ProductId {
        ProductId::new(id)
    }

    fn cart_of(lines: &[(i32, i32)]) -> Cart {
        Cart::from_lines(lines.iter().map(|&(id, qty)| CartLine::new(pid(id), qty)))
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut cart = Cart::new();
        assert!(cart.add(pid(5), 1));
        assert!(cart.add(pid(9), 3));

        let ids: Vec<_> = cart.lines().iter().map(|l| l.product_id).collect();
        assert_eq!(ids, vec![pid(5), pid(9)]);
        assert_eq!(cart.quantity_of(pid(9)), Some(3));
    }

    #[test]
    fn test_add_existing_does_not_merge() {
        let mut cart = cart_of(&[(7, 1)]);
        assert!(!cart.add(pid(7), 4));
        assert_eq!(cart.quantity_of(pid(7)), Some(1));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_increment_only_touches_matching_line() {
        let mut cart = cart_of(&[(1, 1), (2, 1)]);
        assert_eq!(cart.increment(pid(1)), Some(2));
        assert_eq!(cart.quantity_of(pid(1)), Some(2));
        assert_eq!(cart.quantity_of(pid(2)), Some(1));
    }

    #[test]
    fn test_decrement() {
        let mut cart = cart_of(&[(1, 3)]);
        assert_eq!(cart.decrement(pid(1)), Some(2));
        assert_eq!(cart.quantity_of(pid(1)), Some(2));
    }

    #[test]
    fn test_decrement_last_unit_removes_line() {
        let mut cart = cart_of(&[(1, 1), (2, 2)]);
        assert_eq!(cart.decrement(pid(1)), Some(0));
        assert!(!cart.contains(pid(1)));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_decrement_removes_restored_non_positive_line() {
        let mut cart = cart_of(&[(1, 0), (2, -4)]);
        assert_eq!(cart.decrement(pid(1)), Some(0));
        assert_eq!(cart.decrement(pid(2)), Some(0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_regardless_of_quantity() {
        let mut cart = cart_of(&[(1, 12)]);
        assert!(cart.remove(pid(1)));
        assert!(cart.is_empty());
        assert!(!cart.remove(pid(1)));
    }

    #[test]
    fn test_from_lines_keeps_first_duplicate() {
        let cart = cart_of(&[(1, 2), (3, 1), (1, 9)]);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.quantity_of(pid(1)), Some(2));
    }

    #[test]
    fn test_discard_leading() {
        let mut cart = cart_of(&[(1, 1), (2, 1), (3, 1)]);
        cart.discard_leading(2);
        assert_eq!(cart.lines(), &[CartLine::new(pid(3), 1)]);

        cart.discard_leading(10);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_quantity() {
        assert_eq!(cart_of(&[(1, 2), (2, 3)]).total_quantity(), 5);
        assert_eq!(Cart::new().total_quantity(), 0);
    }

    #[test]
    fn test_apply_reports_changes() {
        let mut cart = Cart::new();

        let update = cart.apply(CartAction::Add, pid(4));
        assert_eq!(update.change, LineChange::Added { quantity: 1 });
        assert!(!update.cart_empty);

        let update = cart.apply(CartAction::Add, pid(4));
        assert_eq!(update.change, LineChange::AlreadyInCart);
        assert!(!update.change.is_modified());

        let update = cart.apply(CartAction::Increment, pid(4));
        assert_eq!(update.change, LineChange::Quantity { quantity: 2 });

        let update = cart.apply(CartAction::Decrement, pid(4));
        assert_eq!(update.change, LineChange::Quantity { quantity: 1 });

        let update = cart.apply(CartAction::Decrement, pid(4));
        assert_eq!(update.change, LineChange::Removed);
        assert!(update.cart_empty);

        let update = cart.apply(CartAction::Remove, pid(4));
        assert_eq!(update.change, LineChange::NotInCart);
    }

    #[test]
    fn test_action_parse() {
        assert_eq!("add".parse::<CartAction>().unwrap(), CartAction::Add);
        assert_eq!("inc".parse::<CartAction>().unwrap(), CartAction::Increment);
        assert_eq!("dec".parse::<CartAction>().unwrap(), CartAction::Decrement);
        assert_eq!("remove".parse::<CartAction>().unwrap(), CartAction::Remove);
        assert_eq!(
            "post".parse::<CartAction>(),
            Err(CartActionError("post".to_owned()))
        );
    }

    #[test]
    fn test_session_format_is_plain_array() {
        let cart = cart_of(&[(10, 2)]);
        let json = serde_json::to_string(&cart).unwrap();
        assert_eq!(json, r#"[{"product_id":10,"quantity":2}]"#);

        let restored: Cart =
            serde_json::from_str(r#"[{"product_id":1,"quantity":1},{"product_id":1,"quantity":5}]"#)
                .unwrap();
        assert_eq!(restored.len(), 1);
    }

    fn arb_cart() -> impl Strategy<Value = Cart> {
        prop::collection::vec((1..20_i32, -2..10_i32), 0..12).prop_map(|pairs| {
            Cart::from_lines(
                pairs
                    .into_iter()
                    .map(|(id, qty)| CartLine::new(ProductId::new(id), qty)),
            )
        })
    }

    fn arb_action() -> impl Strategy<Value = CartAction> {
        prop_oneof![
            Just(CartAction::Add),
            Just(CartAction::Increment),
            Just(CartAction::Decrement),
            Just(CartAction::Remove),
        ]
    }

    proptest! {
        #[test]
        fn prop_absent_product_ops_are_noops(cart in arb_cart(), id in 20..40_i32) {
            let product_id = ProductId::new(id);
            let mut mutated = cart.clone();

            prop_assert_eq!(mutated.increment(product_id), None);
            prop_assert_eq!(mutated.decrement(product_id), None);
            prop_assert!(!mutated.remove(product_id));
            prop_assert_eq!(mutated, cart);
        }

        #[test]
        fn prop_decrement_of_single_unit_removes(cart in arb_cart(), id in 40..60_i32) {
            let product_id = ProductId::new(id);
            let mut cart = cart;
            cart.add(product_id, 1);

            cart.decrement(product_id);
            prop_assert!(!cart.contains(product_id));
        }

        #[test]
        fn prop_second_add_is_noop(cart in arb_cart(), id in 40..60_i32, q1 in 1..10_i32, q2 in 1..10_i32) {
            let product_id = ProductId::new(id);
            let mut cart = cart;

            prop_assert!(cart.add(product_id, q1));
            prop_assert!(cart.contains(product_id));
            prop_assert_eq!(cart.quantity_of(product_id), Some(q1));

            let before = cart.clone();
            prop_assert!(!cart.add(product_id, q2));
            prop_assert_eq!(cart, before);
        }

        #[test]
        fn prop_actions_keep_lines_unique_and_positive(
            actions in prop::collection::vec((arb_action(), 1..8_i32), 0..40)
        ) {
            let mut cart = Cart::new();
            for (action, id) in actions {
                cart.apply(action, ProductId::new(id));
            }

            let mut ids: Vec<_> = cart.lines().iter().map(|l| l.product_id).collect();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), cart.len());
            prop_assert!(cart.lines().iter().all(|l| l.quantity >= 1));
        }
    }
}
