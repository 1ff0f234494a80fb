//! Domain services.
//!
//! Services hold the control-flow logic between the routes and the store
//! traits. Each borrows the store for the duration of a request, the same
//! shape as a repository-backed service.

pub mod cart;
pub mod catalog;
pub mod guests;
pub mod memberships;
pub mod orders;
pub mod profiles;

pub use cart::CartService;
pub use catalog::CatalogService;
pub use guests::GuestService;
pub use memberships::MembershipService;
pub use orders::OrderService;
pub use profiles::ProfileService;

use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by the domain services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The referenced record does not exist. Reported, not fatal.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller's input was rejected before any write.
    #[error("invalid input: {0}")]
    Invalid(String),

    /// The data store failed; the operation was aborted and prior state
    /// left as-is.
    #[error(transparent)]
    Store(#[from] StoreError),
}
