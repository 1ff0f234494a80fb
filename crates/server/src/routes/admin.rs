//! Admin route handlers: vendor overview and membership lifecycle.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;

use marquee_core::{MembershipId, MembershipPlan, ProfileId, Role};

use crate::error::AppError;
use crate::guard::{self, RouteAccess};
use crate::services::{MembershipService, ProfileService};
use crate::state::AppState;
use crate::store::{MembershipStore, ProfileStore};

use super::RouteResult;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(overview))
        .route("/memberships", post(add_membership))
        .route("/memberships/{id}", get(membership_detail))
        .route("/memberships/{id}/extend", post(extend_membership))
        .route("/memberships/{id}/cancel", post(cancel_membership))
}

/// Membership grant form data.
#[derive(Debug, Deserialize)]
pub struct AddMembershipForm {
    pub vendor_id: ProfileId,
    pub plan: MembershipPlan,
}

/// Membership extension form data.
#[derive(Debug, Deserialize)]
pub struct ExtendMembershipForm {
    pub plan: MembershipPlan,
}

/// `GET /admin`
///
/// One payload for both dashboard tabs: every profile with its role
/// (newest first), the vendor subset, and the membership records.
pub async fn overview(State(state): State<AppState>) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::Role(Role::Admin))?;

    let users = ProfileService::new(state.store()).list_with_roles().await?;
    let vendors = state.store().list_vendors().await?;
    let memberships = state.store().list_memberships().await?;

    Ok(Json(json!({
        "users": users,
        "vendors": vendors,
        "memberships": memberships,
    }))
    .into_response())
}

/// `POST /admin/memberships`
pub async fn add_membership(
    State(state): State<AppState>,
    Json(form): Json<AddMembershipForm>,
) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::Role(Role::Admin))?;

    let membership = MembershipService::new(state.store())
        .add(form.vendor_id, form.plan)
        .await?;

    Ok((StatusCode::CREATED, Json(membership)).into_response())
}

/// `GET /admin/memberships/{id}`
pub async fn membership_detail(
    State(state): State<AppState>,
    Path(id): Path<MembershipId>,
) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::Role(Role::Admin))?;

    let membership = state
        .store()
        .membership_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("membership {id}")))?;

    Ok(Json(membership).into_response())
}

/// `POST /admin/memberships/{id}/extend`
pub async fn extend_membership(
    State(state): State<AppState>,
    Path(id): Path<MembershipId>,
    Json(form): Json<ExtendMembershipForm>,
) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::Role(Role::Admin))?;

    let membership = MembershipService::new(state.store())
        .extend(id, form.plan)
        .await?;

    Ok(Json(membership).into_response())
}

/// `POST /admin/memberships/{id}/cancel`
pub async fn cancel_membership(
    State(state): State<AppState>,
    Path(id): Path<MembershipId>,
) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::Role(Role::Admin))?;

    let membership = MembershipService::new(state.store()).cancel(id).await?;

    Ok(Json(membership).into_response())
}
