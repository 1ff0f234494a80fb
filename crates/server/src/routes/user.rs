//! User route handlers: browsing, cart, orders, and the guest list.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use marquee_core::{CartItemId, CategoryId, GuestId, ProductId, ProfileId, Role};

use crate::error::AppError;
use crate::guard::{self, RouteAccess};
use crate::models::CartLine;
use crate::services::{CartService, CatalogService, GuestService, OrderService};
use crate::session::SessionSnapshot;
use crate::state::AppState;

use super::RouteResult;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard))
        .route("/vendors", get(browse))
        .route("/cart", get(cart).post(add_to_cart))
        .route("/cart/{id}", delete(remove_from_cart))
        .route("/orders", get(orders).post(place_order))
        .route("/guests", get(guests).post(add_guest))
        .route("/guests/{id}", delete(remove_guest))
}

/// Browse query parameters.
#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    pub category: Option<CategoryId>,
}

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// New guest form data.
#[derive(Debug, Deserialize)]
pub struct NewGuestForm {
    pub name: String,
    pub email: Option<String>,
}

fn user_profile(snapshot: &SessionSnapshot) -> Result<ProfileId, AppError> {
    snapshot
        .profile_id
        .ok_or_else(|| AppError::Unauthorized("no user profile".to_string()))
}

/// `GET /user`
///
/// Dashboard summary: cart, order, and guest counts.
pub async fn dashboard(State(state): State<AppState>) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::Role(Role::User))?;
    let user = user_profile(&snapshot)?;

    let cart = CartService::new(state.store()).lines(user).await?;
    let orders = OrderService::new(state.store()).history(user).await?;
    let guests = GuestService::new(state.store()).list(user).await?;

    Ok(Json(json!({
        "cart_count": cart.len(),
        "order_count": orders.len(),
        "guest_count": guests.len(),
    }))
    .into_response())
}

/// `GET /user/vendors`
///
/// Active products across vendors, optionally filtered by category, plus
/// the category list for the filter control.
pub async fn browse(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::Role(Role::User))?;

    let catalog = CatalogService::new(state.store());
    let products = catalog.browse(query.category).await?;
    let categories = catalog.categories().await?;

    Ok(Json(json!({ "products": products, "categories": categories })).into_response())
}

/// `GET /user/cart`
pub async fn cart(State(state): State<AppState>) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::Role(Role::User))?;
    let user = user_profile(&snapshot)?;

    let lines = CartService::new(state.store()).lines(user).await?;
    let total: Decimal = lines.iter().map(CartLine::subtotal).sum();

    Ok(Json(json!({ "lines": lines, "total": total })).into_response())
}

/// `POST /user/cart`
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(form): Json<AddToCartForm>,
) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::Role(Role::User))?;
    let user = user_profile(&snapshot)?;

    let item = CartService::new(state.store())
        .add(user, form.product_id, form.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(item)).into_response())
}

/// `DELETE /user/cart/{id}`
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(id): Path<CartItemId>,
) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::Role(Role::User))?;
    user_profile(&snapshot)?;

    CartService::new(state.store()).remove(id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// `GET /user/orders`
pub async fn orders(State(state): State<AppState>) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::Role(Role::User))?;
    let user = user_profile(&snapshot)?;

    let history = OrderService::new(state.store()).history(user).await?;

    Ok(Json(history).into_response())
}

/// `POST /user/orders`
///
/// Place an order from the current cart. An empty cart is a no-op and
/// reports so rather than failing.
pub async fn place_order(State(state): State<AppState>) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::Role(Role::User))?;
    let user = user_profile(&snapshot)?;

    match OrderService::new(state.store()).place_order(user).await? {
        Some(order) => Ok((StatusCode::CREATED, Json(order)).into_response()),
        None => Ok(Json(json!({ "order": null, "message": "cart is empty" })).into_response()),
    }
}

/// `GET /user/guests`
pub async fn guests(State(state): State<AppState>) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::Role(Role::User))?;
    let user = user_profile(&snapshot)?;

    let list = GuestService::new(state.store()).list(user).await?;

    Ok(Json(list).into_response())
}

/// `POST /user/guests`
pub async fn add_guest(
    State(state): State<AppState>,
    Json(form): Json<NewGuestForm>,
) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::Role(Role::User))?;
    let user = user_profile(&snapshot)?;

    let guest = GuestService::new(state.store())
        .add(user, &form.name, form.email.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(guest)).into_response())
}

/// `DELETE /user/guests/{id}`
pub async fn remove_guest(
    State(state): State<AppState>,
    Path(id): Path<GuestId>,
) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::Role(Role::User))?;
    user_profile(&snapshot)?;

    GuestService::new(state.store()).remove(id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
