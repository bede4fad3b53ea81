//! Middleware and extractors for the favorites API.

pub mod cors;
pub mod identity;

pub use cors::create_cors_layer;
pub use identity::{UserId, USER_ID_HEADER};
