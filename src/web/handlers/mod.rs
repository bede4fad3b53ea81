//! API handlers for the favorites API.

pub mod favorite;

pub use favorite::*;

use std::sync::Arc;

use crate::db::Database;
use crate::favorite::FavoriteLimits;

/// Shared state of the HTTP handlers.
pub struct AppState {
    /// Primary and replica pools.
    pub db: Arc<Database>,
    /// Limits handed to every [`crate::favorite::FavoriteService`].
    pub limits: FavoriteLimits,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Arc<Database>, limits: FavoriteLimits) -> Self {
        Self { db, limits }
    }
}
