//! Vendor catalog management and the public product listing.

use rust_decimal::Decimal;

use marquee_core::{CategoryId, ProductId, ProfileId};

use crate::models::{NewProduct, Product, VendorCategory};
use crate::store::CatalogStore;

use super::ServiceError;

/// Catalog operations over a catalog store.
pub struct CatalogService<'a, S> {
    store: &'a S,
}

impl<'a, S: CatalogStore> CatalogService<'a, S> {
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create a product for a vendor.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Invalid`] for a blank name or negative price;
    /// store failures otherwise.
    pub async fn create_product(
        &self,
        vendor: ProfileId,
        name: &str,
        price: Decimal,
        category_id: Option<CategoryId>,
        image_url: Option<String>,
    ) -> Result<Product, ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Invalid("product name is required".into()));
        }
        if price < Decimal::ZERO {
            return Err(ServiceError::Invalid(
                "product price cannot be negative".into(),
            ));
        }

        Ok(self
            .store
            .insert_product(NewProduct {
                vendor_id: vendor,
                category_id,
                name: name.to_owned(),
                price,
                image_url,
            })
            .await?)
    }

    /// A vendor's own products, newest first.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn vendor_products(&self, vendor: ProfileId) -> Result<Vec<Product>, ServiceError> {
        Ok(self.store.products_by_vendor(vendor).await?)
    }

    /// Active products for the public listing, optionally by category.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn browse(
        &self,
        category: Option<CategoryId>,
    ) -> Result<Vec<Product>, ServiceError> {
        Ok(self.store.active_products(category).await?)
    }

    /// Delete one of the vendor's products.
    ///
    /// # Errors
    ///
    /// [`ServiceError::NotFound`] if the product does not exist or is
    /// owned by someone else; ownership is checked before the delete.
    pub async fn delete_product(
        &self,
        vendor: ProfileId,
        id: ProductId,
    ) -> Result<(), ServiceError> {
        let product = self
            .store
            .product_by_id(id)
            .await?
            .filter(|p| p.vendor_id == vendor)
            .ok_or_else(|| ServiceError::NotFound(format!("product {id}")))?;

        Ok(self.store.delete_product(product.id).await?)
    }

    /// The vendor categories.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn categories(&self) -> Result<Vec<VendorCategory>, ServiceError> {
        Ok(self.store.list_categories().await?)
    }
}
