//! HTTP API for Treehole favorites.
//!
//! A thin axum layer over [`crate::favorite`]. Identity comes from the
//! upstream gateway, see [`middleware::identity`].

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
