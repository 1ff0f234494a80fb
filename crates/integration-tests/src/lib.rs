//! Integration tests for Marquee.
//!
//! The suites run the real session manager and domain services against
//! the in-memory store and auth provider, so they cover the same code
//! paths as production minus the network.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p marquee-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session_resolution` - sign-in/up/out driving the session snapshot
//! - `order_placement` - the cart-to-order transaction and its failure modes
//! - `memberships` - the membership lifecycle date arithmetic
//! - `services` - catalog, cart, and guest list service behavior

use std::sync::Arc;

use rust_decimal::Decimal;

use marquee_core::{Email, ProfileId, Role};
use marquee_server::models::Product;
use marquee_server::session::SessionManager;
use marquee_server::store::{CatalogStore, MemoryAuth, MemoryStore};

/// An in-memory backend: the store and its paired auth provider.
pub struct TestBackend {
    pub store: Arc<MemoryStore>,
    pub auth: Arc<MemoryAuth>,
}

impl TestBackend {
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let auth = Arc::new(MemoryAuth::new(Arc::clone(&store)));
        Self { store, auth }
    }

    /// Start a session manager over this backend.
    #[must_use]
    pub fn session_manager(&self) -> SessionManager<MemoryAuth> {
        SessionManager::new(Arc::clone(&self.auth), Arc::clone(&self.store))
    }

    /// Provision a profile with the given role, bypassing sign-up.
    pub async fn provision(&self, name: &str, email: &str, role: Role) -> ProfileId {
        let email = Email::parse(email).expect("valid test email");
        let profile = self
            .store
            .insert_profile(marquee_core::IdentityId::generate(), name, email)
            .await;
        self.store.assign_role(profile.id, role).await;
        profile.id
    }

    /// Insert an active product for a vendor.
    pub async fn product(&self, vendor: ProfileId, name: &str, price: Decimal) -> Product {
        self.store
            .insert_product(marquee_server::models::NewProduct {
                vendor_id: vendor,
                category_id: None,
                name: name.to_owned(),
                price,
                image_url: None,
            })
            .await
            .expect("memory store insert cannot fail")
    }
}

impl Default for TestBackend {
    fn default() -> Self {
        Self::new()
    }
}
