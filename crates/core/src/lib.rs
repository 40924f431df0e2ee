//! Pokeshop Core - Shared types library.
//!
//! This crate provides the common types used by the API crate: type-safe
//! entity IDs, the `Email` wrapper, the tagged `Credential` value, and the
//! status enums that define the wire vocabulary.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. Database support (sqlx impls for the newtypes) is gated behind
//! the `postgres` feature.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
