//! Order placement and order history.

use rust_decimal::Decimal;

use marquee_core::ProfileId;

use crate::models::{CartLine, NewOrder, NewOrderItem, Order, OrderItem};
use crate::store::{CartStore, OrderStore};

use super::ServiceError;

/// Order operations over a cart and order store.
pub struct OrderService<'a, S> {
    store: &'a S,
}

impl<'a, S: CartStore + OrderStore> OrderService<'a, S> {
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Place an order from the user's current cart.
    ///
    /// The cart is read once at the start and that snapshot drives the
    /// whole operation: the total, the derived line items, and their
    /// frozen prices. An empty cart is a no-op, `Ok(None)`, with zero
    /// writes.
    ///
    /// Write order is fixed: order header, then line items, then cart
    /// clear. A failed header write aborts with nothing persisted; a
    /// failed line-item write aborts before the cart is touched, leaving
    /// the order header behind for reconciliation; a failed cart clear is
    /// surfaced to the caller with the order already fully placed.
    ///
    /// # Errors
    ///
    /// Propagates the first store failure; see above for what is and is
    /// not persisted at each stage.
    pub async fn place_order(&self, user: ProfileId) -> Result<Option<Order>, ServiceError> {
        let lines = self.store.cart_lines(user).await?;
        if lines.is_empty() {
            return Ok(None);
        }

        let total: Decimal = lines.iter().map(CartLine::subtotal).sum();

        let order = self
            .store
            .create_order(NewOrder {
                user_id: user,
                total_amount: total,
            })
            .await?;

        let items = lines
            .iter()
            .map(|line| NewOrderItem {
                order_id: order.id,
                product_id: line.product.id,
                vendor_id: line.product.vendor_id,
                quantity: line.item.quantity,
                price: line.product.price,
            })
            .collect();

        self.store.insert_order_items(items).await?;

        self.store.clear_cart(user).await?;

        Ok(Some(order))
    }

    /// The user's order history, newest first.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn history(&self, user: ProfileId) -> Result<Vec<Order>, ServiceError> {
        Ok(self.store.orders_for_user(user).await?)
    }

    /// Line items sold by a vendor across all orders.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn vendor_transactions(
        &self,
        vendor: ProfileId,
    ) -> Result<Vec<OrderItem>, ServiceError> {
        Ok(self.store.order_items_for_vendor(vendor).await?)
    }
}
