//! Domain models for the marketplace.
//!
//! These are validated domain objects with serde names matching the
//! backend's stored column names, so the same types move through the
//! REST store client and the JSON route responses.

pub mod catalog;
pub mod guest;
pub mod membership;
pub mod order;

pub use catalog::{NewProduct, Product, VendorCategory};
pub use guest::{GuestEntry, NewGuest};
pub use membership::{Membership, MembershipUpdate, NewMembership};
pub use order::{CartItem, CartLine, NewOrder, NewOrderItem, Order, OrderItem};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use marquee_core::{Email, IdentityId, ProfileId, Role};

/// Externally authenticated principal, owned by the auth provider.
///
/// Referenced, never mutated, by this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub email: Email,
}

/// Internal user record, linked 1:1 to an [`Identity`].
///
/// Provisioned by the auth provider from sign-up metadata; the id is
/// immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    #[serde(rename = "auth_id")]
    pub identity_id: IdentityId,
    pub name: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

/// A profile together with its resolved role, for the admin listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileWithRole {
    #[serde(flatten)]
    pub profile: Profile,
    pub role: Option<Role>,
}
