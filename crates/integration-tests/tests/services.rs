//! Catalog, cart, and guest list service behavior.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use marquee_core::{Email, IdentityId, ProductId, Role, RsvpStatus};
use marquee_integration_tests::TestBackend;
use marquee_server::services::{
    CartService, CatalogService, GuestService, ProfileService, ServiceError,
};

#[tokio::test]
async fn test_admin_listing_joins_profiles_with_roles_newest_first() {
    let backend = TestBackend::new();
    let vendor = backend.provision("Vendor", "v@example.com", Role::Vendor).await;
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    let user = backend.provision("User", "u@example.com", Role::User).await;
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;

    // Account without a role row: visible, with no role.
    let bare = backend
        .store
        .insert_profile(
            IdentityId::generate(),
            "Pending",
            Email::parse("p@example.com").unwrap(),
        )
        .await;

    let listed = ProfileService::new(backend.store.as_ref())
        .list_with_roles()
        .await
        .unwrap();

    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].profile.id, bare.id);
    assert_eq!(listed[0].role, None);
    assert_eq!(listed[1].profile.id, user);
    assert_eq!(listed[1].role, Some(Role::User));
    assert_eq!(listed[2].profile.id, vendor);
    assert_eq!(listed[2].role, Some(Role::Vendor));
}

#[tokio::test]
async fn test_create_product_requires_a_name() {
    let backend = TestBackend::new();
    let vendor = backend.provision("Vendor", "v@example.com", Role::Vendor).await;

    let result = CatalogService::new(backend.store.as_ref())
        .create_product(vendor, "   ", Decimal::from(10), None, None)
        .await;
    assert!(matches!(result, Err(ServiceError::Invalid(_))));
}

#[tokio::test]
async fn test_create_product_rejects_negative_price() {
    let backend = TestBackend::new();
    let vendor = backend.provision("Vendor", "v@example.com", Role::Vendor).await;

    let result = CatalogService::new(backend.store.as_ref())
        .create_product(vendor, "Balloons", Decimal::from(-5), None, None)
        .await;
    assert!(matches!(result, Err(ServiceError::Invalid(_))));
}

#[tokio::test]
async fn test_browse_filters_by_category() {
    let backend = TestBackend::new();
    let vendor = backend.provision("Vendor", "v@example.com", Role::Vendor).await;
    let catering = backend.store.add_category("Catering").await;
    let service = CatalogService::new(backend.store.as_ref());

    service
        .create_product(vendor, "Canapes", Decimal::from(30), Some(catering.id), None)
        .await
        .unwrap();
    service
        .create_product(vendor, "Speakers", Decimal::from(80), None, None)
        .await
        .unwrap();

    let all = service.browse(None).await.unwrap();
    assert_eq!(all.len(), 2);

    let filtered = service.browse(Some(catering.id)).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "Canapes");
}

#[tokio::test]
async fn test_vendor_cannot_delete_another_vendors_product() {
    let backend = TestBackend::new();
    let vendor = backend.provision("Vendor", "v@example.com", Role::Vendor).await;
    let other = backend.provision("Other", "o@example.com", Role::Vendor).await;
    let product = backend.product(vendor, "Chairs", Decimal::from(100)).await;

    let service = CatalogService::new(backend.store.as_ref());
    let result = service.delete_product(other, product.id).await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));

    // Still present for its owner.
    assert_eq!(service.vendor_products(vendor).await.unwrap().len(), 1);

    service.delete_product(vendor, product.id).await.unwrap();
    assert!(service.vendor_products(vendor).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cart_rejects_zero_quantity_and_unknown_product() {
    let backend = TestBackend::new();
    let vendor = backend.provision("Vendor", "v@example.com", Role::Vendor).await;
    let user = backend.provision("User", "u@example.com", Role::User).await;
    let product = backend.product(vendor, "Cake", Decimal::from(50)).await;

    let service = CartService::new(backend.store.as_ref());

    let zero = service.add(user, product.id, 0).await;
    assert!(matches!(zero, Err(ServiceError::Invalid(_))));

    let unknown = service.add(user, ProductId::generate(), 1).await;
    assert!(matches!(unknown, Err(ServiceError::NotFound(_))));

    assert!(service.lines(user).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cart_add_and_remove() {
    let backend = TestBackend::new();
    let vendor = backend.provision("Vendor", "v@example.com", Role::Vendor).await;
    let user = backend.provision("User", "u@example.com", Role::User).await;
    let product = backend.product(vendor, "Cake", Decimal::from(50)).await;

    let service = CartService::new(backend.store.as_ref());
    let item = service.add(user, product.id, 3).await.unwrap();

    let lines = service.lines(user).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].subtotal(), Decimal::from(150));

    service.remove(item.id).await.unwrap();
    assert!(service.lines(user).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_guest_email_is_optional_but_validated() {
    let backend = TestBackend::new();
    let user = backend.provision("User", "u@example.com", Role::User).await;
    let service = GuestService::new(backend.store.as_ref());

    let no_email = service.add(user, "Frank", None).await.unwrap();
    assert!(no_email.email.is_none());
    assert_eq!(no_email.rsvp_status, RsvpStatus::Pending);

    // Blank email is treated as absent, not as an error.
    let blank = service.add(user, "Grace", Some("  ")).await.unwrap();
    assert!(blank.email.is_none());

    let bad = service.add(user, "Heidi", Some("not-an-email")).await;
    assert!(matches!(bad, Err(ServiceError::Invalid(_))));

    let blank_name = service.add(user, "", Some("ok@example.com")).await;
    assert!(matches!(blank_name, Err(ServiceError::Invalid(_))));
}

#[tokio::test]
async fn test_guest_list_is_oldest_first_and_scoped_to_user() {
    let backend = TestBackend::new();
    let user = backend.provision("User", "u@example.com", Role::User).await;
    let other = backend.provision("Other", "o@example.com", Role::User).await;
    let service = GuestService::new(backend.store.as_ref());

    let first = service.add(user, "First", None).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    let second = service.add(user, "Second", None).await.unwrap();
    service.add(other, "Elsewhere", None).await.unwrap();

    let listed = service.list(user).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, first.id);
    assert_eq!(listed[1].id, second.id);

    service.remove(first.id).await.unwrap();
    assert_eq!(service.list(user).await.unwrap().len(), 1);
}
