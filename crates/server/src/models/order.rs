//! Cart and order types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use marquee_core::{CartItemId, OrderId, OrderItemId, OrderStatus, ProductId, ProfileId};

use super::catalog::Product;

/// A cart entry owned by a user profile.
///
/// Ephemeral: deleted on order placement or explicit removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: ProfileId,
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A cart item joined with its product, as rendered on the cart page and
/// consumed by the order placement transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub item: CartItem,
    pub product: Product,
}

impl CartLine {
    /// Line subtotal: product price at snapshot time times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.item.quantity)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: ProfileId,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating an order (status defaults to pending).
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub user_id: ProfileId,
    pub total_amount: Decimal,
}

/// A line item of a placed order.
///
/// `price` is copied from the product at order time, not a live
/// reference, so later price changes never affect historical orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub vendor_id: ProfileId,
    pub quantity: u32,
    pub price: Decimal,
}

/// Fields for creating an order item.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub vendor_id: ProfileId,
    pub quantity: u32,
    pub price: Decimal,
}
