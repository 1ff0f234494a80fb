//! Route guard.
//!
//! A pure, total decision function from the resolved session snapshot and
//! a route's declared access requirement to exactly one outcome. The
//! decision is made before any page data is assembled, keeping it
//! independently testable from the handlers.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};

use marquee_core::Role;

use crate::session::SessionSnapshot;

/// Login route, target of unauthenticated access to gated routes.
pub const LOGIN_PATH: &str = "/login";

/// Application root, target of role mismatches.
pub const ROOT_PATH: &str = "/";

/// A route's declared access requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// No requirement; rendered for everyone.
    Public,
    /// Landing/login/signup: a fully resolved signed-in session is sent
    /// to its role home instead.
    GuestOnly,
    /// Only the given role may render; others are redirected.
    Role(Role),
}

/// The guard's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Resolution still in flight: show a neutral waiting state, never
    /// redirect.
    Wait,
    /// Render the route's content.
    Render,
    /// Redirect to the given path.
    RedirectTo(&'static str),
}

/// Decide the outcome for a snapshot and access requirement.
///
/// Total over the full `{identity present/absent} x {role} x {loading}`
/// grid:
///
/// - `loading` on a guarded route always wins with [`RouteDecision::Wait`].
/// - [`RouteAccess::GuestOnly`] redirects a signed-in session to its role
///   home only once the role is resolved; an identity without a role
///   renders the guest content (unprovisioned accounts fall through).
/// - [`RouteAccess::Role`]: no identity redirects to login; a resolved
///   session with a different (or absent) role redirects to the root.
#[must_use]
pub fn decide(snapshot: &SessionSnapshot, access: RouteAccess) -> RouteDecision {
    match access {
        RouteAccess::Public => RouteDecision::Render,
        _ if snapshot.loading => RouteDecision::Wait,
        RouteAccess::GuestOnly => match (&snapshot.identity, snapshot.role) {
            (Some(_), Some(role)) => RouteDecision::RedirectTo(role.home_path()),
            _ => RouteDecision::Render,
        },
        RouteAccess::Role(required) => match (&snapshot.identity, snapshot.role) {
            (None, _) => RouteDecision::RedirectTo(LOGIN_PATH),
            (Some(_), Some(role)) if role == required => RouteDecision::Render,
            (Some(_), _) => RouteDecision::RedirectTo(ROOT_PATH),
        },
    }
}

/// Apply the guard in a handler: `Ok(())` means render; `Err` carries the
/// ready-made wait or redirect response.
///
/// # Errors
///
/// Returns the non-render response to send instead of the page.
pub fn check(snapshot: &SessionSnapshot, access: RouteAccess) -> Result<(), Response> {
    match decide(snapshot, access) {
        RouteDecision::Render => Ok(()),
        RouteDecision::Wait => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "resolving_session" })),
        )
            .into_response()),
        RouteDecision::RedirectTo(path) => Err(Redirect::to(path).into_response()),
    }
}
