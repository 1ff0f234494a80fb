//! The cart-to-order transaction and its failure modes.
//!
//! Uses the memory store's failure injection to fail each write step in
//! turn and asserts exactly what is persisted afterwards.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::Ordering;

use rust_decimal::Decimal;

use marquee_core::{ProfileId, Role};
use marquee_integration_tests::TestBackend;
use marquee_server::services::{OrderService, ServiceError};
use marquee_server::store::{CartStore, CatalogStore, OrderStore, ProfileStore};

/// A user with two cart lines: 2 x 100 and 1 x 50.
async fn backend_with_cart() -> (TestBackend, ProfileId) {
    let backend = TestBackend::new();
    let vendor = backend.provision("Vendor", "v@example.com", Role::Vendor).await;
    let user = backend.provision("User", "u@example.com", Role::User).await;

    let chairs = backend.product(vendor, "Chairs", Decimal::from(100)).await;
    let cake = backend.product(vendor, "Cake", Decimal::from(50)).await;

    backend.store.add_cart_item(user, chairs.id, 2).await.unwrap();
    backend.store.add_cart_item(user, cake.id, 1).await.unwrap();

    (backend, user)
}

#[tokio::test]
async fn test_place_order_totals_freezes_and_clears() {
    let (backend, user) = backend_with_cart().await;

    let order = OrderService::new(backend.store.as_ref())
        .place_order(user)
        .await
        .unwrap()
        .expect("non-empty cart places an order");

    assert_eq!(order.total_amount, Decimal::from(250));

    let orders = backend.store.orders_for_user(user).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, order.id);

    let lines = backend.store.cart_lines(user).await.unwrap();
    assert!(lines.is_empty(), "cart is cleared after placement");
}

#[tokio::test]
async fn test_order_items_carry_frozen_prices() {
    let (backend, user) = backend_with_cart().await;
    let vendor = backend.store.list_vendors().await.unwrap()[0].id;

    OrderService::new(backend.store.as_ref())
        .place_order(user)
        .await
        .unwrap()
        .unwrap();

    let mut items = backend.store.order_items_for_vendor(vendor).await.unwrap();
    assert_eq!(items.len(), 2);
    items.sort_by_key(|i| i.price);
    assert_eq!(items[0].price, Decimal::from(50));
    assert_eq!(items[0].quantity, 1);
    assert_eq!(items[1].price, Decimal::from(100));
    assert_eq!(items[1].quantity, 2);

    // Deleting the product afterwards does not disturb the frozen items.
    backend.store.delete_product(items[1].product_id).await.unwrap();
    let after = backend.store.order_items_for_vendor(vendor).await.unwrap();
    assert_eq!(after.len(), 2);
    assert!(after.iter().any(|i| i.price == Decimal::from(100)));
}

#[tokio::test]
async fn test_empty_cart_is_a_noop() {
    let backend = TestBackend::new();
    let user = backend.provision("User", "u@example.com", Role::User).await;

    let writes_before = backend.store.write_count();

    let placed = OrderService::new(backend.store.as_ref())
        .place_order(user)
        .await
        .unwrap();

    assert!(placed.is_none());
    assert_eq!(backend.store.write_count(), writes_before, "zero writes");
    assert!(backend.store.orders_for_user(user).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_order_header_persists_nothing() {
    let (backend, user) = backend_with_cart().await;
    backend.store.fail_create_order.store(true, Ordering::SeqCst);

    let result = OrderService::new(backend.store.as_ref())
        .place_order(user)
        .await;
    assert!(matches!(result, Err(ServiceError::Store(_))));

    assert!(backend.store.orders_for_user(user).await.unwrap().is_empty());
    assert_eq!(backend.store.cart_lines(user).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_failed_line_items_keep_the_cart() {
    let (backend, user) = backend_with_cart().await;
    let vendor = backend.store.list_vendors().await.unwrap()[0].id;
    backend.store.fail_order_items.store(true, Ordering::SeqCst);

    let result = OrderService::new(backend.store.as_ref())
        .place_order(user)
        .await;
    assert!(matches!(result, Err(ServiceError::Store(_))));

    // The header write already happened; the cart must be untouched so
    // the user can retry.
    assert_eq!(backend.store.orders_for_user(user).await.unwrap().len(), 1);
    assert!(backend.store.order_items_for_vendor(vendor).await.unwrap().is_empty());
    assert_eq!(backend.store.cart_lines(user).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_failed_cart_clear_surfaces_with_order_placed() {
    let (backend, user) = backend_with_cart().await;
    let vendor = backend.store.list_vendors().await.unwrap()[0].id;
    backend.store.fail_clear_cart.store(true, Ordering::SeqCst);

    let result = OrderService::new(backend.store.as_ref())
        .place_order(user)
        .await;
    assert!(matches!(result, Err(ServiceError::Store(_))));

    // Order and items are fully placed; only the cleanup failed.
    assert_eq!(backend.store.orders_for_user(user).await.unwrap().len(), 1);
    assert_eq!(
        backend.store.order_items_for_vendor(vendor).await.unwrap().len(),
        2
    );
    assert_eq!(backend.store.cart_lines(user).await.unwrap().len(), 2);
}
