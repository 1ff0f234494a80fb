//! Authentication route handlers.
//!
//! Login, the two signup flows, and logout. The auth provider owns
//! credential verification; these handlers drive it and wait for the
//! session manager to publish the resolved snapshot, so the response can
//! carry the role-home redirect target.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use marquee_core::{CategoryId, Role};

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::guard::{self, ROOT_PATH, RouteAccess};
use crate::state::AppState;
use crate::store::SignUpMetadata;

use super::RouteResult;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// User signup form data.
#[derive(Debug, Deserialize)]
pub struct SignupUserForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Vendor signup form data.
#[derive(Debug, Deserialize)]
pub struct SignupVendorForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub category_id: Option<CategoryId>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /login`
pub async fn login_page(State(state): State<AppState>) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::GuestOnly)?;

    Ok(Json(json!({ "page": "login" })).into_response())
}

/// `POST /login`
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> RouteResult<Response> {
    // Subscribe before the sign-in so the resulting change is never missed.
    let mut updates = state.sessions().subscribe();

    state.sessions().sign_in(&form.email, &form.password).await?;

    let snapshot = updates
        .wait_for(|s| !s.loading && s.identity.is_some())
        .await
        .map_err(|_| AppError::Internal("session manager stopped".to_string()))?
        .clone();

    if let (Some(identity), Some(profile)) = (&snapshot.identity, snapshot.profile_id) {
        set_sentry_user(&profile, Some(identity.email.as_str()));
    }

    let redirect = snapshot.role.map_or(ROOT_PATH, Role::home_path);
    Ok(Json(json!({ "redirect_to": redirect })).into_response())
}

/// `GET /signup/user`
pub async fn signup_user_page(State(state): State<AppState>) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::GuestOnly)?;

    Ok(Json(json!({ "page": "signup_user" })).into_response())
}

/// `POST /signup/user`
pub async fn signup_user(
    State(state): State<AppState>,
    Json(form): Json<SignupUserForm>,
) -> RouteResult<Response> {
    signup(
        &state,
        &form.email,
        &form.password,
        SignUpMetadata {
            name: form.name,
            role: Role::User,
            category_id: None,
        },
    )
    .await
}

/// `GET /signup/vendor`
///
/// The vendor signup form includes a category select, so the page data
/// carries the category list.
pub async fn signup_vendor_page(State(state): State<AppState>) -> RouteResult<Response> {
    let snapshot = state.sessions().snapshot();
    guard::check(&snapshot, RouteAccess::GuestOnly)?;

    let categories = crate::services::CatalogService::new(state.store())
        .categories()
        .await?;
    Ok(Json(json!({ "page": "signup_vendor", "categories": categories })).into_response())
}

/// `POST /signup/vendor`
pub async fn signup_vendor(
    State(state): State<AppState>,
    Json(form): Json<SignupVendorForm>,
) -> RouteResult<Response> {
    signup(
        &state,
        &form.email,
        &form.password,
        SignUpMetadata {
            name: form.name,
            role: Role::Vendor,
            category_id: form.category_id,
        },
    )
    .await
}

/// `POST /logout`
pub async fn logout(State(state): State<AppState>) -> RouteResult<Response> {
    state.sessions().sign_out().await?;
    clear_sentry_user();

    Ok(Json(json!({ "redirect_to": ROOT_PATH })).into_response())
}

/// Shared signup flow: create the account, then wait for the resolved
/// snapshot. The backend provisions the profile and role rows from the
/// metadata as part of account creation.
async fn signup(
    state: &AppState,
    email: &str,
    password: &str,
    metadata: SignUpMetadata,
) -> RouteResult<Response> {
    let mut updates = state.sessions().subscribe();

    state.sessions().sign_up(email, password, metadata).await?;

    let snapshot = updates
        .wait_for(|s| !s.loading && s.identity.is_some())
        .await
        .map_err(|_| AppError::Internal("session manager stopped".to_string()))?
        .clone();

    if let (Some(identity), Some(profile)) = (&snapshot.identity, snapshot.profile_id) {
        set_sentry_user(&profile, Some(identity.email.as_str()));
    }

    let redirect = snapshot.role.map_or(ROOT_PATH, Role::home_path);
    Ok(Json(json!({ "redirect_to": redirect })).into_response())
}
