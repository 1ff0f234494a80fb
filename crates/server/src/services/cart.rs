//! Shopping cart operations.

use marquee_core::{CartItemId, ProductId, ProfileId};

use crate::models::{CartItem, CartLine};
use crate::store::{CartStore, CatalogStore};

use super::ServiceError;

/// Cart operations over a cart and catalog store.
pub struct CartService<'a, S> {
    store: &'a S,
}

impl<'a, S: CartStore + CatalogStore> CartService<'a, S> {
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Add a product to the user's cart.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Invalid`] for a zero quantity,
    /// [`ServiceError::NotFound`] for an unknown or inactive product.
    pub async fn add(
        &self,
        user: ProfileId,
        product: ProductId,
        quantity: u32,
    ) -> Result<CartItem, ServiceError> {
        if quantity == 0 {
            return Err(ServiceError::Invalid("quantity must be at least 1".into()));
        }

        let known = self
            .store
            .product_by_id(product)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| ServiceError::NotFound(format!("product {product}")))?;

        Ok(self.store.add_cart_item(user, known.id, quantity).await?)
    }

    /// The user's cart, joined with product data.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn lines(&self, user: ProfileId) -> Result<Vec<CartLine>, ServiceError> {
        Ok(self.store.cart_lines(user).await?)
    }

    /// Remove a single cart entry.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn remove(&self, id: CartItemId) -> Result<(), ServiceError> {
        Ok(self.store.remove_cart_item(id).await?)
    }
}
