//! Product catalog types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use marquee_core::{CategoryId, ProductId, ProfileId};

/// A vendor category (e.g. catering, photography).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorCategory {
    pub id: CategoryId,
    pub name: String,
}

/// A product offered by a vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub vendor_id: ProfileId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a product.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub vendor_id: ProfileId,
    pub category_id: Option<CategoryId>,
    pub name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
}
