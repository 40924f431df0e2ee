//! Core types for Pokeshop.
//!
//! Type-safe wrappers for the domain concepts shared across the workspace.

pub mod credential;
pub mod email;
pub mod id;
pub mod status;

pub use credential::Credential;
pub use email::{Email, EmailError};
pub use id::*;
pub use status::*;
