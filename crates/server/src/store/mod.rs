//! Data-store client seam.
//!
//! All persistence and credential verification is delegated to an external
//! backend-as-a-service. These traits are the only surface the rest of the
//! application sees; the backend contract is query-by-equality and
//! ordered-list-fetch over named record collections, plus insert,
//! update-by-id, and delete-by-id.
//!
//! Two implementations exist:
//!
//! - [`rest`] - the production client, speaking the backend's JSON API
//! - [`memory`] - a mutex-map store for tests and local development
//!
//! No retries are implemented anywhere; every failed operation surfaces
//! immediately to the initiating caller.

pub mod auth;
pub mod memory;
pub mod rest;

pub use auth::{AuthChange, AuthProvider, RestAuthClient, SignUpMetadata};
pub use memory::{MemoryAuth, MemoryStore};
pub use rest::RestStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use marquee_core::{
    CartItemId, CategoryId, EmailError, GuestId, IdentityId, MembershipId, ProductId, ProfileId,
    Role,
};

use crate::models::{
    CartItem, CartLine, GuestEntry, Membership, MembershipUpdate, NewGuest, NewMembership,
    NewOrder, NewOrderItem, NewProduct, Order, OrderItem, Product, Profile, VendorCategory,
};

/// Errors that can occur talking to the data store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request never produced a usable response.
    #[error("store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with an error payload.
    #[error("store rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status reported by the store.
        status: u16,
        /// Error message from the store, best-effort.
        message: String,
    },

    /// The store's response could not be decoded.
    #[error("malformed store response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Update or delete targeted a record that does not exist.
    #[error("record not found")]
    NotFound,
}

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Invalid credentials (wrong password or unknown account).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("account already exists")]
    AccountExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// The auth provider could not be reached or answered garbage.
    #[error("auth provider error: {0}")]
    Provider(#[from] StoreError),
}

/// Profile and role lookups backing session resolution.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Profile linked to the given identity, if provisioned.
    async fn profile_by_identity(
        &self,
        identity: IdentityId,
    ) -> Result<Option<Profile>, StoreError>;

    /// Role assignment for a profile. A missing row is `None`, not an error.
    async fn role_for_profile(&self, profile: ProfileId) -> Result<Option<Role>, StoreError>;

    /// All profiles, newest first (admin listing).
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError>;

    /// Profiles holding the vendor role.
    async fn list_vendors(&self) -> Result<Vec<Profile>, StoreError>;
}

/// Product catalog operations.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError>;

    /// A vendor's own products, newest first.
    async fn products_by_vendor(&self, vendor: ProfileId) -> Result<Vec<Product>, StoreError>;

    /// Active products for the public listing, optionally filtered by category.
    async fn active_products(
        &self,
        category: Option<CategoryId>,
    ) -> Result<Vec<Product>, StoreError>;

    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError>;

    async fn list_categories(&self) -> Result<Vec<VendorCategory>, StoreError>;
}

/// Shopping cart operations.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn add_cart_item(
        &self,
        user: ProfileId,
        product: ProductId,
        quantity: u32,
    ) -> Result<CartItem, StoreError>;

    /// The user's cart joined with product data.
    async fn cart_lines(&self, user: ProfileId) -> Result<Vec<CartLine>, StoreError>;

    async fn remove_cart_item(&self, id: CartItemId) -> Result<(), StoreError>;

    /// Delete every cart item belonging to the user.
    async fn clear_cart(&self, user: ProfileId) -> Result<(), StoreError>;
}

/// Order persistence.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn create_order(&self, order: NewOrder) -> Result<Order, StoreError>;

    async fn insert_order_items(&self, items: Vec<NewOrderItem>) -> Result<(), StoreError>;

    /// A user's order history, newest first.
    async fn orders_for_user(&self, user: ProfileId) -> Result<Vec<Order>, StoreError>;

    /// Order items sold by a vendor (the vendor transaction feed).
    async fn order_items_for_vendor(
        &self,
        vendor: ProfileId,
    ) -> Result<Vec<OrderItem>, StoreError>;
}

/// Vendor membership persistence.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    async fn insert_membership(&self, membership: NewMembership)
    -> Result<Membership, StoreError>;

    /// Lookup by exact id. A miss is `None`, not an error.
    async fn membership_by_id(&self, id: MembershipId)
    -> Result<Option<Membership>, StoreError>;

    /// Apply a partial update; returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record has this id.
    async fn update_membership(
        &self,
        id: MembershipId,
        update: MembershipUpdate,
    ) -> Result<Membership, StoreError>;

    /// All memberships, newest first.
    async fn list_memberships(&self) -> Result<Vec<Membership>, StoreError>;
}

/// Guest list persistence.
#[async_trait]
pub trait GuestStore: Send + Sync {
    async fn insert_guest(&self, guest: NewGuest) -> Result<GuestEntry, StoreError>;

    /// A user's guests, oldest first.
    async fn guests_for_user(&self, user: ProfileId) -> Result<Vec<GuestEntry>, StoreError>;

    async fn delete_guest(&self, id: GuestId) -> Result<(), StoreError>;
}

/// Helper shared by implementations: newest-first ordering key.
pub(crate) fn newest_first<T>(mut rows: Vec<T>, key: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    rows.sort_by_key(|r| std::cmp::Reverse(key(r)));
    rows
}
