//! GreenCart Core - Shared types library.
//!
//! This crate provides common types used across all GreenCart components:
//! - `client` - HTTP client, session store and data hooks for the REST API
//! - `cli` - Command-line storefront and role dashboards
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! Every persistent entity is owned by the backend; these types describe the
//! client's transient view of it.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, roles, money, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
