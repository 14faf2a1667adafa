//! The shopper workflow end to end over in-memory storage: fill a cart,
//! price it, check out, read the history, cancel.

#![allow(clippy::unwrap_used)]

use estore_core::{Cart, CartAction, LineChange, Price, ProductId, UserId};
use estore_storefront::services::{
    CatalogReader, ClearPolicy, OrderHistory, OrderSubmitter, PricingAggregator,
};
use estore_storefront::testing::{InMemoryCatalog, InMemoryOrders, product};

fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::new([
        product(1, "Classic Tee", "10.00"),
        product(2, "Zip Hoodie", "20.00"),
        product(3, "Enamel Mug", "8.00"),
    ])
}

fn price(s: &str) -> Price {
    product(0, "", s).price
}

#[tokio::test]
async fn cart_to_history_and_back() {
    let products = catalog();
    let orders = InMemoryOrders::new();
    let user = UserId::new(42);

    let mut cart = Cart::new();
    cart.apply(CartAction::Add, ProductId::new(1));
    cart.apply(CartAction::Increment, ProductId::new(1));
    cart.apply(CartAction::Add, ProductId::new(2));
    cart.apply(CartAction::Increment, ProductId::new(2));
    cart.apply(CartAction::Increment, ProductId::new(2));

    let pricing = PricingAggregator::new(CatalogReader::new(&products));
    assert_eq!(pricing.total_price(&cart).await, price("80.00"));

    let submitter = OrderSubmitter::new(&orders);
    let result = submitter.checkout(&mut cart, user).await;
    assert_eq!(result.orders_submitted, 2);
    assert!(result.all_succeeded);
    assert!(cart.is_empty());

    let history = OrderHistory::new(&orders, CatalogReader::new(&products));
    let views = history.user_orders(user).await;
    let lines: Vec<_> = views
        .iter()
        .map(|v| (v.product_id.as_i32(), v.quantity, v.line_total))
        .collect();
    assert_eq!(
        lines,
        vec![(1, 2, Some(price("20.00"))), (2, 3, Some(price("60.00")))]
    );

    submitter.cancel_user_order(user, views[0].id).await;
    let remaining = history.user_orders(user).await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].product_id, ProductId::new(2));
}

#[tokio::test]
async fn partial_failure_default_policy_drops_the_rest() {
    let products = catalog();
    let orders = InMemoryOrders::new();
    orders.fail_inserts_from(2);

    let mut cart = Cart::new();
    for id in [1, 2, 3] {
        cart.apply(CartAction::Add, ProductId::new(id));
    }

    let result = OrderSubmitter::new(&orders)
        .checkout(&mut cart, UserId::new(1))
        .await;

    assert_eq!(result.orders_submitted, 1);
    assert!(!result.all_succeeded);
    assert_eq!(result.failed_product, Some(ProductId::new(2)));
    assert_eq!(orders.insert_attempts(), 2);
    assert!(cart.is_empty());

    let history = OrderHistory::new(&orders, CatalogReader::new(&products))
        .user_orders(UserId::new(1))
        .await;
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn partial_failure_can_be_retried_with_submitted_policy() {
    let orders = InMemoryOrders::new();
    orders.fail_inserts_from(2);
    let submitter = OrderSubmitter::new(&orders).with_policy(ClearPolicy::Submitted);

    let mut cart = Cart::new();
    for id in [1, 2, 3] {
        cart.apply(CartAction::Add, ProductId::new(id));
    }

    let first = submitter.checkout(&mut cart, UserId::new(1)).await;
    assert_eq!(first.orders_submitted, 1);
    assert_eq!(cart.len(), 2);
    assert!(!cart.contains(ProductId::new(1)));

    // Storage recovers; the shopper checks out again.
    orders.fail_inserts_from(0);
    let second = submitter.checkout(&mut cart, UserId::new(1)).await;
    assert_eq!(second.orders_submitted, 2);
    assert!(second.all_succeeded);
    assert!(cart.is_empty());

    let products: Vec<_> = orders
        .rows()
        .iter()
        .map(|o| o.product_id.as_i32())
        .collect();
    assert_eq!(products, vec![1, 2, 3]);
}

#[tokio::test]
async fn vanished_product_stays_in_history_without_details() {
    let orders = InMemoryOrders::new();
    let mut cart = Cart::new();
    cart.apply(CartAction::Add, ProductId::new(9));

    OrderSubmitter::new(&orders)
        .checkout(&mut cart, UserId::new(5))
        .await;

    let products = catalog();
    let views = OrderHistory::new(&orders, CatalogReader::new(&products))
        .user_orders(UserId::new(5))
        .await;

    assert_eq!(views.len(), 1);
    assert!(views[0].product.is_none());
    assert!(views[0].line_total.is_none());
}

#[tokio::test]
async fn decrement_to_zero_removes_line_before_checkout() {
    let orders = InMemoryOrders::new();
    let mut cart = Cart::new();
    cart.apply(CartAction::Add, ProductId::new(1));
    cart.apply(CartAction::Add, ProductId::new(2));

    let update = cart.apply(CartAction::Decrement, ProductId::new(1));
    assert_eq!(update.change, LineChange::Removed);

    let result = OrderSubmitter::new(&orders)
        .checkout(&mut cart, UserId::new(1))
        .await;
    assert_eq!(result.orders_submitted, 1);
    assert_eq!(orders.rows()[0].product_id, ProductId::new(2));
}

#[tokio::test]
async fn buy_now_leaves_cart_alone() {
    let products = catalog();
    let orders = InMemoryOrders::new();
    let mut cart = Cart::new();
    cart.apply(CartAction::Add, ProductId::new(3));

    let ok = OrderSubmitter::new(&orders)
        .buy_now(&CatalogReader::new(&products), UserId::new(1), ProductId::new(2), 0)
        .await;

    assert!(ok);
    assert_eq!(cart.len(), 1);
    assert_eq!(orders.rows()[0].quantity, 1);
}
