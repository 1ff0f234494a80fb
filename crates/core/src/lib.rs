//! Marquee Core - Shared types library.
//!
//! This crate provides common types used across all Marquee components:
//! - `server` - Marketplace application server
//! - `integration-tests` - Cross-module tests against the in-memory store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! backend access. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
