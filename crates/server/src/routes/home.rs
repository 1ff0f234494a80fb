//! Landing page handler.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::guard::{self, RouteAccess};
use crate::services::CatalogService;
use crate::state::AppState;

use super::RouteResult;

/// `GET /`
///
/// Guest landing page: the vendor categories that drive the marketing
/// copy and the signup links. A signed-in, resolved session is redirected
/// to its role home by the guard.
pub async fn landing(State(state): State<AppState>) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::GuestOnly)?;

    let categories = CatalogService::new(state.store()).categories().await?;
    Ok(Json(json!({ "page": "landing", "categories": categories })).into_response())
}
