//! Database row models and wire DTOs.
//!
//! Row structs derive `sqlx::FromRow` against the French column names of
//! the schema; the request/response DTOs keep the French field names on
//! the wire via serde renames.

pub mod catalog;
pub mod order;
pub mod payment;
pub mod review;
pub mod user;

pub use catalog::{CatalogItem, CatalogItemUpdate, NewCatalogItem};
pub use order::{DeliveryUpdate, NewOrder, NewOrderLine, Order, OrderLineDetail};
pub use payment::Payment;
pub use review::Review;
pub use user::{NewUser, User, UserProfile, UserUpdate};
