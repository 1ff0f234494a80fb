//! Membership lifecycle: grant, extend, cancel.

#![allow(clippy::unwrap_used)]

use chrono::{TimeZone, Utc};

use marquee_core::{MembershipId, MembershipPlan, MembershipStatus, Role};
use marquee_integration_tests::TestBackend;
use marquee_server::models::NewMembership;
use marquee_server::services::memberships::plan_end;
use marquee_server::services::{MembershipService, ServiceError};
use marquee_server::store::MembershipStore;

fn date(y: i32, m: u32, d: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

#[tokio::test]
async fn test_add_grants_active_membership_for_plan_duration() {
    let backend = TestBackend::new();
    let vendor = backend.provision("Vendor", "v@example.com", Role::Vendor).await;

    let membership = MembershipService::new(backend.store.as_ref())
        .add(vendor, MembershipPlan::OneYear)
        .await
        .unwrap();

    assert_eq!(membership.vendor_id, vendor);
    assert_eq!(membership.plan, MembershipPlan::OneYear);
    assert_eq!(membership.status, MembershipStatus::Active);
    assert_eq!(
        membership.end_date,
        plan_end(membership.start_date, MembershipPlan::OneYear)
    );
}

#[tokio::test]
async fn test_extend_offsets_from_stored_end_date() {
    let backend = TestBackend::new();
    let vendor = backend.provision("Vendor", "v@example.com", Role::Vendor).await;

    let membership = backend
        .store
        .insert_membership(NewMembership {
            vendor_id: vendor,
            plan: MembershipPlan::SixMonths,
            start_date: date(2024, 1, 15),
            end_date: date(2024, 7, 15),
        })
        .await
        .unwrap();

    let extended = MembershipService::new(backend.store.as_ref())
        .extend(membership.id, MembershipPlan::OneYear)
        .await
        .unwrap();

    // Offset applies to the stored end, not to now, and the plan is
    // overwritten with the extension plan.
    assert_eq!(extended.end_date, date(2025, 7, 15));
    assert_eq!(extended.plan, MembershipPlan::OneYear);
    assert_eq!(extended.status, MembershipStatus::Active);
    assert_eq!(extended.start_date, membership.start_date);
}

#[tokio::test]
async fn test_extend_clamps_month_end() {
    let backend = TestBackend::new();
    let vendor = backend.provision("Vendor", "v@example.com", Role::Vendor).await;

    let membership = backend
        .store
        .insert_membership(NewMembership {
            vendor_id: vendor,
            plan: MembershipPlan::SixMonths,
            start_date: date(2023, 2, 28),
            end_date: date(2023, 8, 31),
        })
        .await
        .unwrap();

    let extended = MembershipService::new(backend.store.as_ref())
        .extend(membership.id, MembershipPlan::SixMonths)
        .await
        .unwrap();

    // Aug 31 + 6 months lands on the last day of February.
    assert_eq!(extended.end_date, date(2024, 2, 29));
}

#[tokio::test]
async fn test_extend_reactivates_cancelled_membership() {
    let backend = TestBackend::new();
    let vendor = backend.provision("Vendor", "v@example.com", Role::Vendor).await;
    let service = MembershipService::new(backend.store.as_ref());

    let membership = service.add(vendor, MembershipPlan::SixMonths).await.unwrap();
    let cancelled = service.cancel(membership.id).await.unwrap();
    assert_eq!(cancelled.status, MembershipStatus::Cancelled);

    let extended = service
        .extend(membership.id, MembershipPlan::TwoYears)
        .await
        .unwrap();
    assert_eq!(extended.status, MembershipStatus::Active);
    assert_eq!(
        extended.end_date,
        plan_end(membership.end_date, MembershipPlan::TwoYears)
    );
}

#[tokio::test]
async fn test_cancel_changes_status_only() {
    let backend = TestBackend::new();
    let vendor = backend.provision("Vendor", "v@example.com", Role::Vendor).await;
    let service = MembershipService::new(backend.store.as_ref());

    let membership = service.add(vendor, MembershipPlan::TwoYears).await.unwrap();
    let cancelled = service.cancel(membership.id).await.unwrap();

    assert_eq!(cancelled.status, MembershipStatus::Cancelled);
    assert_eq!(cancelled.start_date, membership.start_date);
    assert_eq!(cancelled.end_date, membership.end_date);
    assert_eq!(cancelled.plan, membership.plan);
}

#[tokio::test]
async fn test_lifecycle_on_unknown_id_is_not_found() {
    let backend = TestBackend::new();
    let service = MembershipService::new(backend.store.as_ref());
    let missing = MembershipId::generate();

    let extend = service.extend(missing, MembershipPlan::OneYear).await;
    assert!(matches!(extend, Err(ServiceError::NotFound(_))));

    let cancel = service.cancel(missing).await;
    assert!(matches!(cancel, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let backend = TestBackend::new();
    let vendor = backend.provision("Vendor", "v@example.com", Role::Vendor).await;
    let service = MembershipService::new(backend.store.as_ref());

    let first = service.add(vendor, MembershipPlan::SixMonths).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    let second = service.add(vendor, MembershipPlan::OneYear).await.unwrap();

    let listed = service.list().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
}
