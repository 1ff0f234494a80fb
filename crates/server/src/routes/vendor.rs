//! Vendor route handlers: item management and the transaction feed.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use marquee_core::{CategoryId, ProductId, ProfileId, Role};

use crate::error::AppError;
use crate::guard::{self, RouteAccess};
use crate::services::{CatalogService, OrderService};
use crate::session::SessionSnapshot;
use crate::state::AppState;

use super::RouteResult;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/items", get(items))
        .route("/items/new", post(create_item))
        .route("/items/{id}", delete(delete_item))
        .route("/transactions", get(transactions))
}

/// New item form data.
#[derive(Debug, Deserialize)]
pub struct NewItemForm {
    pub name: String,
    pub price: Decimal,
    pub category_id: Option<CategoryId>,
    pub image_url: Option<String>,
}

fn vendor_profile(snapshot: &SessionSnapshot) -> Result<ProfileId, AppError> {
    snapshot
        .profile_id
        .ok_or_else(|| AppError::Unauthorized("no vendor profile".to_string()))
}

/// `GET /vendor`
///
/// Dashboard summary: catalog size, sale count, and gross revenue from
/// the transaction feed.
pub async fn dashboard(State(state): State<AppState>) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::Role(Role::Vendor))?;
    let vendor = vendor_profile(&snapshot)?;

    let products = CatalogService::new(state.store())
        .vendor_products(vendor)
        .await?;
    let sales = OrderService::new(state.store())
        .vendor_transactions(vendor)
        .await?;
    let revenue: Decimal = sales
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum();

    Ok(Json(json!({
        "product_count": products.len(),
        "sale_count": sales.len(),
        "revenue": revenue,
    }))
    .into_response())
}

/// `GET /vendor/items`
pub async fn items(State(state): State<AppState>) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::Role(Role::Vendor))?;
    let vendor = vendor_profile(&snapshot)?;

    let products = CatalogService::new(state.store())
        .vendor_products(vendor)
        .await?;

    Ok(Json(products).into_response())
}

/// `POST /vendor/items/new`
pub async fn create_item(
    State(state): State<AppState>,
    Json(form): Json<NewItemForm>,
) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::Role(Role::Vendor))?;
    let vendor = vendor_profile(&snapshot)?;

    let product = CatalogService::new(state.store())
        .create_product(
            vendor,
            &form.name,
            form.price,
            form.category_id,
            form.image_url,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(product)).into_response())
}

/// `DELETE /vendor/items/{id}`
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::Role(Role::Vendor))?;
    let vendor = vendor_profile(&snapshot)?;

    CatalogService::new(state.store())
        .delete_product(vendor, id)
        .await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// `GET /vendor/transactions`
pub async fn transactions(State(state): State<AppState>) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::Role(Role::Vendor))?;
    let vendor = vendor_profile(&snapshot)?;

    let sales = OrderService::new(state.store())
        .vendor_transactions(vendor)
        .await?;

    Ok(Json(sales).into_response())
}
