//! REST data-store client.
//!
//! Speaks the backend's JSON collection API: equality filters and ordering
//! as query parameters, inserts and partial updates returning the affected
//! representation. This is the production implementation of every store
//! trait; the server holds exactly one instance, cheaply cloneable via
//! `Arc`.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

use marquee_core::{
    CartItemId, CategoryId, GuestId, IdentityId, MembershipId, ProductId, ProfileId, Role,
};

use super::{
    CartStore, CatalogStore, GuestStore, MembershipStore, OrderStore, ProfileStore, StoreError,
};
use crate::models::{
    CartItem, CartLine, GuestEntry, Membership, MembershipUpdate, NewGuest, NewMembership,
    NewOrder, NewOrderItem, NewProduct, Order, OrderItem, Product, Profile, VendorCategory,
};

struct RestStoreInner {
    client: reqwest::Client,
    base: Url,
    api_key: String,
}

/// Client for the backend's record collections.
#[derive(Clone)]
pub struct RestStore {
    inner: Arc<RestStoreInner>,
}

impl RestStore {
    /// Create a new store client against the backend base URL.
    ///
    /// The key is the server-side service key; row-level access rules are
    /// enforced by this application's route guard, not by the store.
    #[must_use]
    pub fn new(base: &Url, api_key: &SecretString) -> Self {
        Self {
            inner: Arc::new(RestStoreInner {
                client: reqwest::Client::new(),
                base: base.clone(),
                api_key: api_key.expose_secret().to_owned(),
            }),
        }
    }

    fn endpoint(&self, collection: &str) -> String {
        format!("{}rest/v1/{collection}", self.inner.base)
    }

    fn request(&self, method: reqwest::Method, collection: &str) -> reqwest::RequestBuilder {
        self.inner
            .client
            .request(method, self.endpoint(collection))
            .header("apikey", &self.inner.api_key)
            .bearer_auth(&self.inner.api_key)
    }

    async fn read_rows<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<Vec<T>, StoreError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                body = %body.chars().take(200).collect::<String>(),
                "store rejected request"
            );
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Equality/ordered fetch over a collection.
    async fn select<T: DeserializeOwned>(
        &self,
        collection: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .request(reqwest::Method::GET, collection)
            .query(query)
            .send()
            .await?;
        Self::read_rows(response).await
    }

    /// Insert one record, returning the stored representation.
    async fn insert_one<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        collection: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        let response = self
            .request(reqwest::Method::POST, collection)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        let rows: Vec<T> = Self::read_rows(response).await?;
        rows.into_iter().next().ok_or(StoreError::NotFound)
    }

    /// Acknowledge a write whose response body is not needed. Success is
    /// judged by status alone; the backend may answer with an empty body.
    async fn write_ack(response: reqwest::Response) -> Result<(), StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }
        Ok(())
    }

    /// Insert a batch of records; the representation is not needed.
    async fn insert_many<B: Serialize + Sync>(
        &self,
        collection: &str,
        body: &[B],
    ) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::POST, collection)
            .header("Prefer", "return=minimal")
            .json(&body)
            .send()
            .await?;
        Self::write_ack(response).await
    }

    /// Partial update by id, returning the updated representation.
    ///
    /// An empty result set means the id matched nothing.
    async fn patch<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        collection: &str,
        id: Uuid,
        body: &B,
    ) -> Result<T, StoreError> {
        let response = self
            .request(reqwest::Method::PATCH, collection)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        let rows: Vec<T> = Self::read_rows(response).await?;
        rows.into_iter().next().ok_or(StoreError::NotFound)
    }

    /// Delete every record matching the filter.
    async fn delete_where(
        &self,
        collection: &str,
        query: &[(&str, String)],
    ) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::DELETE, collection)
            .query(query)
            .send()
            .await?;
        Self::write_ack(response).await
    }

    fn in_filter(ids: impl Iterator<Item = Uuid>) -> String {
        let joined = ids.map(|id| id.to_string()).collect::<Vec<_>>().join(",");
        format!("in.({joined})")
    }
}

#[derive(Debug, serde::Deserialize)]
struct RoleRow {
    role: Role,
}

#[derive(Debug, serde::Deserialize)]
struct VendorRoleRow {
    user_id: ProfileId,
}

#[async_trait]
impl ProfileStore for RestStore {
    async fn profile_by_identity(
        &self,
        identity: IdentityId,
    ) -> Result<Option<Profile>, StoreError> {
        let rows: Vec<Profile> = self
            .select("profiles", &[("auth_id", format!("eq.{identity}"))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn role_for_profile(&self, profile: ProfileId) -> Result<Option<Role>, StoreError> {
        let rows: Vec<RoleRow> = self
            .select("user_roles", &[("user_id", format!("eq.{profile}"))])
            .await?;
        Ok(rows.into_iter().next().map(|r| r.role))
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        self.select("profiles", &[("order", "created_at.desc".to_owned())])
            .await
    }

    async fn list_vendors(&self) -> Result<Vec<Profile>, StoreError> {
        let vendor_rows: Vec<VendorRoleRow> = self
            .select("user_roles", &[("role", "eq.vendor".to_owned())])
            .await?;
        if vendor_rows.is_empty() {
            return Ok(Vec::new());
        }

        let filter = Self::in_filter(vendor_rows.iter().map(|r| r.user_id.as_uuid()));
        self.select("profiles", &[("id", filter)]).await
    }
}

#[async_trait]
impl CatalogStore for RestStore {
    async fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError> {
        self.insert_one("products", &product).await
    }

    async fn products_by_vendor(&self, vendor: ProfileId) -> Result<Vec<Product>, StoreError> {
        self.select(
            "products",
            &[
                ("vendor_id", format!("eq.{vendor}")),
                ("order", "created_at.desc".to_owned()),
            ],
        )
        .await
    }

    async fn active_products(
        &self,
        category: Option<CategoryId>,
    ) -> Result<Vec<Product>, StoreError> {
        let mut query = vec![("is_active", "eq.true".to_owned())];
        if let Some(category) = category {
            query.push(("category_id", format!("eq.{category}")));
        }
        self.select("products", &query).await
    }

    async fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let rows: Vec<Product> = self
            .select("products", &[("id", format!("eq.{id}"))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        self.delete_where("products", &[("id", format!("eq.{id}"))])
            .await
    }

    async fn list_categories(&self) -> Result<Vec<VendorCategory>, StoreError> {
        self.select("vendor_categories", &[]).await
    }
}

#[async_trait]
impl CartStore for RestStore {
    async fn add_cart_item(
        &self,
        user: ProfileId,
        product: ProductId,
        quantity: u32,
    ) -> Result<CartItem, StoreError> {
        self.insert_one(
            "cart_items",
            &serde_json::json!({
                "user_id": user,
                "product_id": product,
                "quantity": quantity,
            }),
        )
        .await
    }

    async fn cart_lines(&self, user: ProfileId) -> Result<Vec<CartLine>, StoreError> {
        let items: Vec<CartItem> = self
            .select("cart_items", &[("user_id", format!("eq.{user}"))])
            .await?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let filter = Self::in_filter(items.iter().map(|i| i.product_id.as_uuid()));
        let products: Vec<Product> = self.select("products", &[("id", filter)]).await?;

        let lines = items
            .into_iter()
            .filter_map(|item| {
                let product = products.iter().find(|p| p.id == item.product_id).cloned();
                if product.is_none() {
                    tracing::warn!(item = %item.id, "cart item references a missing product");
                }
                product.map(|product| CartLine { item, product })
            })
            .collect();
        Ok(lines)
    }

    async fn remove_cart_item(&self, id: CartItemId) -> Result<(), StoreError> {
        self.delete_where("cart_items", &[("id", format!("eq.{id}"))])
            .await
    }

    async fn clear_cart(&self, user: ProfileId) -> Result<(), StoreError> {
        self.delete_where("cart_items", &[("user_id", format!("eq.{user}"))])
            .await
    }
}

#[async_trait]
impl OrderStore for RestStore {
    async fn create_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        self.insert_one("orders", &order).await
    }

    async fn insert_order_items(&self, items: Vec<NewOrderItem>) -> Result<(), StoreError> {
        self.insert_many("order_items", &items).await
    }

    async fn orders_for_user(&self, user: ProfileId) -> Result<Vec<Order>, StoreError> {
        self.select(
            "orders",
            &[
                ("user_id", format!("eq.{user}")),
                ("order", "created_at.desc".to_owned()),
            ],
        )
        .await
    }

    async fn order_items_for_vendor(
        &self,
        vendor: ProfileId,
    ) -> Result<Vec<OrderItem>, StoreError> {
        self.select(
            "order_items",
            &[("vendor_id", format!("eq.{vendor}"))],
        )
        .await
    }
}

#[async_trait]
impl MembershipStore for RestStore {
    async fn insert_membership(
        &self,
        membership: NewMembership,
    ) -> Result<Membership, StoreError> {
        self.insert_one("vendor_memberships", &membership).await
    }

    async fn membership_by_id(
        &self,
        id: MembershipId,
    ) -> Result<Option<Membership>, StoreError> {
        let rows: Vec<Membership> = self
            .select("vendor_memberships", &[("id", format!("eq.{id}"))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn update_membership(
        &self,
        id: MembershipId,
        update: MembershipUpdate,
    ) -> Result<Membership, StoreError> {
        self.patch("vendor_memberships", id.as_uuid(), &update).await
    }

    async fn list_memberships(&self) -> Result<Vec<Membership>, StoreError> {
        self.select(
            "vendor_memberships",
            &[("order", "created_at.desc".to_owned())],
        )
        .await
    }
}

#[async_trait]
impl GuestStore for RestStore {
    async fn insert_guest(&self, guest: NewGuest) -> Result<GuestEntry, StoreError> {
        self.insert_one("guest_list", &guest).await
    }

    async fn guests_for_user(&self, user: ProfileId) -> Result<Vec<GuestEntry>, StoreError> {
        self.select(
            "guest_list",
            &[
                ("user_id", format!("eq.{user}")),
                ("order", "created_at.asc".to_owned()),
            ],
        )
        .await
    }

    async fn delete_guest(&self, id: GuestId) -> Result<(), StoreError> {
        self.delete_where("guest_list", &[("id", format!("eq.{id}"))])
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http;

    use super::*;

    fn response(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(
            http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_write_ack_accepts_empty_success_body() {
        // Bulk inserts and deletes may be acknowledged with no body.
        assert!(RestStore::write_ack(response(201, "")).await.is_ok());
        assert!(RestStore::write_ack(response(204, "")).await.is_ok());
    }

    #[tokio::test]
    async fn test_write_ack_reports_rejection() {
        let error = RestStore::write_ack(response(409, "duplicate key"))
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            StoreError::Rejected { status: 409, ref message } if message == "duplicate key"
        ));
    }

    #[tokio::test]
    async fn test_read_rows_rejects_error_status() {
        let error = RestStore::read_rows::<Profile>(response(500, "boom"))
            .await
            .unwrap_err();
        assert!(matches!(error, StoreError::Rejected { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_read_rows_flags_malformed_body() {
        let error = RestStore::read_rows::<Profile>(response(200, "not json"))
            .await
            .unwrap_err();
        assert!(matches!(error, StoreError::Malformed(_)));
    }
}
