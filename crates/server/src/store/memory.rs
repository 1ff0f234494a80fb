//! In-memory data store.
//!
//! Backs the test suites and local development without a backend. The
//! store holds mutex-guarded vectors per collection and mirrors the REST
//! client's ordering semantics; the auth half provisions profile and role
//! rows from sign-up metadata exactly the way the backend's account
//! trigger does.
//!
//! Failure injection toggles let transaction tests fail a single write
//! step; the write counter lets them assert that an aborted operation
//! performed no writes at all.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, broadcast};

use marquee_core::{
    CartItemId, CategoryId, Email, GuestId, IdentityId, MembershipId, MembershipStatus, OrderId,
    OrderItemId, OrderStatus, ProductId, ProfileId, Role, RsvpStatus,
};

use super::auth::{
    AUTH_EVENT_CAPACITY, AuthChange, AuthProvider, MIN_PASSWORD_LENGTH, SignUpMetadata,
};
use super::{
    AuthError, CartStore, CatalogStore, GuestStore, MembershipStore, OrderStore, ProfileStore,
    StoreError, newest_first,
};
use crate::models::{
    CartItem, CartLine, GuestEntry, Identity, Membership, MembershipUpdate, NewGuest,
    NewMembership, NewOrder, NewOrderItem, NewProduct, Order, OrderItem, Product, Profile,
    VendorCategory,
};

fn injected_failure(step: &str) -> StoreError {
    StoreError::Rejected {
        status: 500,
        message: format!("injected failure: {step}"),
    }
}

/// Mutex-map implementation of every store trait.
#[derive(Default)]
pub struct MemoryStore {
    profiles: Mutex<Vec<Profile>>,
    roles: Mutex<HashMap<ProfileId, Role>>,
    categories: Mutex<Vec<VendorCategory>>,
    products: Mutex<Vec<Product>>,
    cart_items: Mutex<Vec<CartItem>>,
    orders: Mutex<Vec<Order>>,
    order_items: Mutex<Vec<OrderItem>>,
    memberships: Mutex<Vec<Membership>>,
    guests: Mutex<Vec<GuestEntry>>,

    /// Fail the next `create_order` call.
    pub fail_create_order: AtomicBool,
    /// Fail the next `insert_order_items` call.
    pub fail_order_items: AtomicBool,
    /// Fail the next `clear_cart` call.
    pub fail_clear_cart: AtomicBool,

    writes: AtomicU64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful write operations so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }

    /// Insert a provisioned profile directly (what the backend trigger does).
    pub async fn insert_profile(
        &self,
        identity_id: IdentityId,
        name: &str,
        email: Email,
    ) -> Profile {
        let profile = Profile {
            id: ProfileId::generate(),
            identity_id,
            name: name.to_owned(),
            email,
            created_at: Utc::now(),
        };
        self.profiles.lock().await.push(profile.clone());
        profile
    }

    /// Assign a role row to a profile.
    pub async fn assign_role(&self, profile: ProfileId, role: Role) {
        self.roles.lock().await.insert(profile, role);
    }

    /// Add a vendor category.
    pub async fn add_category(&self, name: &str) -> VendorCategory {
        let category = VendorCategory {
            id: CategoryId::generate(),
            name: name.to_owned(),
        };
        self.categories.lock().await.push(category.clone());
        category
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn profile_by_identity(
        &self,
        identity: IdentityId,
    ) -> Result<Option<Profile>, StoreError> {
        Ok(self
            .profiles
            .lock()
            .await
            .iter()
            .find(|p| p.identity_id == identity)
            .cloned())
    }

    async fn role_for_profile(&self, profile: ProfileId) -> Result<Option<Role>, StoreError> {
        Ok(self.roles.lock().await.get(&profile).copied())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let rows = self.profiles.lock().await.clone();
        Ok(newest_first(rows, |p| p.created_at))
    }

    async fn list_vendors(&self) -> Result<Vec<Profile>, StoreError> {
        let roles = self.roles.lock().await.clone();
        Ok(self
            .profiles
            .lock()
            .await
            .iter()
            .filter(|p| roles.get(&p.id) == Some(&Role::Vendor))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError> {
        let product = Product {
            id: ProductId::generate(),
            vendor_id: product.vendor_id,
            category_id: product.category_id,
            name: product.name,
            price: product.price,
            image_url: product.image_url,
            is_active: true,
            created_at: Utc::now(),
        };
        self.products.lock().await.push(product.clone());
        self.record_write();
        Ok(product)
    }

    async fn products_by_vendor(&self, vendor: ProfileId) -> Result<Vec<Product>, StoreError> {
        let rows = self
            .products
            .lock()
            .await
            .iter()
            .filter(|p| p.vendor_id == vendor)
            .cloned()
            .collect();
        Ok(newest_first(rows, |p| p.created_at))
    }

    async fn active_products(
        &self,
        category: Option<CategoryId>,
    ) -> Result<Vec<Product>, StoreError> {
        Ok(self
            .products
            .lock()
            .await
            .iter()
            .filter(|p| p.is_active)
            .filter(|p| category.is_none() || p.category_id == category)
            .cloned()
            .collect())
    }

    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self
            .products
            .lock()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        self.products.lock().await.retain(|p| p.id != id);
        self.record_write();
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<VendorCategory>, StoreError> {
        Ok(self.categories.lock().await.clone())
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn add_cart_item(
        &self,
        user: ProfileId,
        product: ProductId,
        quantity: u32,
    ) -> Result<CartItem, StoreError> {
        let item = CartItem {
            id: CartItemId::generate(),
            user_id: user,
            product_id: product,
            quantity,
        };
        self.cart_items.lock().await.push(item.clone());
        self.record_write();
        Ok(item)
    }

    async fn cart_lines(&self, user: ProfileId) -> Result<Vec<CartLine>, StoreError> {
        let products = self.products.lock().await.clone();
        Ok(self
            .cart_items
            .lock()
            .await
            .iter()
            .filter(|i| i.user_id == user)
            .filter_map(|item| {
                products
                    .iter()
                    .find(|p| p.id == item.product_id)
                    .map(|product| CartLine {
                        item: item.clone(),
                        product: product.clone(),
                    })
            })
            .collect())
    }

    async fn remove_cart_item(&self, id: CartItemId) -> Result<(), StoreError> {
        self.cart_items.lock().await.retain(|i| i.id != id);
        self.record_write();
        Ok(())
    }

    async fn clear_cart(&self, user: ProfileId) -> Result<(), StoreError> {
        if self.fail_clear_cart.swap(false, Ordering::SeqCst) {
            return Err(injected_failure("clear_cart"));
        }
        self.cart_items.lock().await.retain(|i| i.user_id != user);
        self.record_write();
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        if self.fail_create_order.swap(false, Ordering::SeqCst) {
            return Err(injected_failure("create_order"));
        }
        let order = Order {
            id: OrderId::generate(),
            user_id: order.user_id,
            total_amount: order.total_amount,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };
        self.orders.lock().await.push(order.clone());
        self.record_write();
        Ok(order)
    }

    async fn insert_order_items(&self, items: Vec<NewOrderItem>) -> Result<(), StoreError> {
        if self.fail_order_items.swap(false, Ordering::SeqCst) {
            return Err(injected_failure("insert_order_items"));
        }
        let mut rows = self.order_items.lock().await;
        for item in items {
            rows.push(OrderItem {
                id: OrderItemId::generate(),
                order_id: item.order_id,
                product_id: item.product_id,
                vendor_id: item.vendor_id,
                quantity: item.quantity,
                price: item.price,
            });
        }
        self.record_write();
        Ok(())
    }

    async fn orders_for_user(&self, user: ProfileId) -> Result<Vec<Order>, StoreError> {
        let rows = self
            .orders
            .lock()
            .await
            .iter()
            .filter(|o| o.user_id == user)
            .cloned()
            .collect();
        Ok(newest_first(rows, |o| o.created_at))
    }

    async fn order_items_for_vendor(
        &self,
        vendor: ProfileId,
    ) -> Result<Vec<OrderItem>, StoreError> {
        Ok(self
            .order_items
            .lock()
            .await
            .iter()
            .filter(|i| i.vendor_id == vendor)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MembershipStore for MemoryStore {
    async fn insert_membership(
        &self,
        membership: NewMembership,
    ) -> Result<Membership, StoreError> {
        let membership = Membership {
            id: MembershipId::generate(),
            vendor_id: membership.vendor_id,
            plan: membership.plan,
            start_date: membership.start_date,
            end_date: membership.end_date,
            status: MembershipStatus::Active,
            created_at: Utc::now(),
        };
        self.memberships.lock().await.push(membership.clone());
        self.record_write();
        Ok(membership)
    }

    async fn membership_by_id(
        &self,
        id: MembershipId,
    ) -> Result<Option<Membership>, StoreError> {
        Ok(self
            .memberships
            .lock()
            .await
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn update_membership(
        &self,
        id: MembershipId,
        update: MembershipUpdate,
    ) -> Result<Membership, StoreError> {
        let mut rows = self.memberships.lock().await;
        let membership = rows
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::NotFound)?;

        if let Some(plan) = update.plan {
            membership.plan = plan;
        }
        if let Some(end_date) = update.end_date {
            membership.end_date = end_date;
        }
        if let Some(status) = update.status {
            membership.status = status;
        }

        self.record_write();
        Ok(membership.clone())
    }

    async fn list_memberships(&self) -> Result<Vec<Membership>, StoreError> {
        let rows = self.memberships.lock().await.clone();
        Ok(newest_first(rows, |m| m.created_at))
    }
}

#[async_trait]
impl GuestStore for MemoryStore {
    async fn insert_guest(&self, guest: NewGuest) -> Result<GuestEntry, StoreError> {
        let entry = GuestEntry {
            id: GuestId::generate(),
            user_id: guest.user_id,
            name: guest.name,
            email: guest.email,
            rsvp_status: RsvpStatus::Pending,
            created_at: Utc::now(),
        };
        self.guests.lock().await.push(entry.clone());
        self.record_write();
        Ok(entry)
    }

    async fn guests_for_user(&self, user: ProfileId) -> Result<Vec<GuestEntry>, StoreError> {
        let mut rows: Vec<GuestEntry> = self
            .guests
            .lock()
            .await
            .iter()
            .filter(|g| g.user_id == user)
            .cloned()
            .collect();
        rows.sort_by_key(|g| g.created_at);
        Ok(rows)
    }

    async fn delete_guest(&self, id: GuestId) -> Result<(), StoreError> {
        self.guests.lock().await.retain(|g| g.id != id);
        self.record_write();
        Ok(())
    }
}

// =============================================================================
// MemoryAuth
// =============================================================================

struct Account {
    password: String,
    identity: Identity,
}

/// In-memory auth provider.
///
/// Accounts live in a map; sign-up provisions the profile and role rows in
/// the paired [`MemoryStore`], mirroring the backend's account trigger.
pub struct MemoryAuth {
    store: Arc<MemoryStore>,
    accounts: Mutex<HashMap<String, Account>>,
    session: Mutex<Option<Identity>>,
    events: broadcast::Sender<AuthChange>,
}

impl MemoryAuth {
    #[must_use]
    pub fn new(store: Arc<MemoryStore>) -> Self {
        let (events, _) = broadcast::channel(AUTH_EVENT_CAPACITY);
        Self {
            store,
            accounts: Mutex::new(HashMap::new()),
            session: Mutex::new(None),
            events,
        }
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let email = Email::parse(email)?;

        let identity = {
            let accounts = self.accounts.lock().await;
            let account = accounts
                .get(email.as_str())
                .ok_or(AuthError::InvalidCredentials)?;
            if account.password != password {
                return Err(AuthError::InvalidCredentials);
            }
            account.identity.clone()
        };

        *self.session.lock().await = Some(identity.clone());
        let _ = self.events.send(AuthChange {
            session: Some(identity),
        });
        Ok(())
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: SignUpMetadata,
    ) -> Result<(), AuthError> {
        let email = Email::parse(email)?;

        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let identity = {
            let mut accounts = self.accounts.lock().await;
            if accounts.contains_key(email.as_str()) {
                return Err(AuthError::AccountExists);
            }
            let identity = Identity {
                id: IdentityId::generate(),
                email: email.clone(),
            };
            accounts.insert(
                email.as_str().to_owned(),
                Account {
                    password: password.to_owned(),
                    identity: identity.clone(),
                },
            );
            identity
        };

        // Provision profile and role the way the backend trigger does.
        let profile = self
            .store
            .insert_profile(identity.id, &metadata.name, email)
            .await;
        self.store.assign_role(profile.id, metadata.role).await;

        *self.session.lock().await = Some(identity.clone());
        let _ = self.events.send(AuthChange {
            session: Some(identity),
        });
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.session.lock().await = None;
        let _ = self.events.send(AuthChange { session: None });
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Identity>, AuthError> {
        Ok(self.session.lock().await.clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.events.subscribe()
    }
}
