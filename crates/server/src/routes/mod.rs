//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Landing page data (categories)
//! GET  /health                  - Health check
//!
//! # Auth
//! GET  /login                   - Login page data
//! POST /login                   - Login action
//! GET  /signup/user             - User signup page data
//! POST /signup/user             - User signup action
//! GET  /signup/vendor           - Vendor signup page data (categories)
//! POST /signup/vendor           - Vendor signup action
//! POST /logout                  - Logout action
//!
//! # Admin (requires admin role)
//! GET  /admin                   - Users, vendors, and memberships overview
//! POST /admin/memberships       - Grant a membership
//! GET  /admin/memberships/{id}  - Membership detail
//! POST /admin/memberships/{id}/extend - Extend a membership
//! POST /admin/memberships/{id}/cancel - Cancel a membership
//!
//! # Vendor (requires vendor role)
//! GET    /vendor                - Dashboard summary
//! GET    /vendor/items          - Own product listing
//! POST   /vendor/items/new      - Create a product
//! DELETE /vendor/items/{id}     - Delete a product
//! GET    /vendor/transactions   - Sold line items
//!
//! # User (requires user role)
//! GET    /user                  - Dashboard summary
//! GET    /user/vendors          - Browse products (?category=)
//! GET    /user/cart             - Cart contents
//! POST   /user/cart             - Add to cart
//! DELETE /user/cart/{id}        - Remove cart item
//! GET    /user/orders           - Order history
//! POST   /user/orders           - Place an order from the cart
//! GET    /user/guests           - Guest list
//! POST   /user/guests           - Add a guest
//! DELETE /user/guests/{id}      - Remove a guest
//! ```

pub mod admin;
pub mod auth;
pub mod home;
pub mod user;
pub mod vendor;

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::error::AppError;
use crate::services::ServiceError;
use crate::state::AppState;
use crate::store::{AuthError, StoreError};

/// Handler-level error: a guard verdict (already a response) or an
/// application error. Lets `guard::check(..)?` and store/service `?`
/// coexist in one handler body.
pub enum RouteError {
    Denied(Response),
    App(AppError),
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        match self {
            Self::Denied(response) => response,
            Self::App(error) => error.into_response(),
        }
    }
}

impl From<Response> for RouteError {
    fn from(response: Response) -> Self {
        Self::Denied(response)
    }
}

impl From<AppError> for RouteError {
    fn from(error: AppError) -> Self {
        Self::App(error)
    }
}

impl From<AuthError> for RouteError {
    fn from(error: AuthError) -> Self {
        Self::App(AppError::Auth(error))
    }
}

impl From<StoreError> for RouteError {
    fn from(error: StoreError) -> Self {
        Self::App(AppError::Store(error))
    }
}

impl From<ServiceError> for RouteError {
    fn from(error: ServiceError) -> Self {
        Self::App(AppError::Service(error))
    }
}

/// Result type alias for route handlers.
pub type RouteResult<T> = Result<T, RouteError>;

/// Create the top-level application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::landing))
        .merge(auth_routes())
        .nest("/admin", admin::routes())
        .nest("/vendor", vendor::routes())
        .nest("/user", user::routes())
}

/// Create the auth routes router.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route(
            "/signup/user",
            get(auth::signup_user_page).post(auth::signup_user),
        )
        .route(
            "/signup/vendor",
            get(auth::signup_vendor_page).post(auth::signup_vendor),
        )
        .route("/logout", post(auth::logout))
}
