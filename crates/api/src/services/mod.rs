//! Domain services that sit between the HTTP routes and the repositories.

pub mod auth;
pub mod token;

pub use auth::AuthError;
pub use token::{TokenError, TokenPair, TokenService};
