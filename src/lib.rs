//! Treehole favorites
//!
//! Favorite groups and memberships for a forum backend: users bookmark holes
//! into named, ordered groups, move them around, and rename or delete groups.
//! Storage is SQLite through sqlx with optional read replicas; an axum layer
//! exposes the operations over HTTP.

pub mod config;
pub mod db;
pub mod error;
pub mod favorite;
pub mod hole;
pub mod logging;
pub mod web;

pub use config::Config;
pub use db::{Access, Database};
pub use error::{Result, TreeholeError};
pub use favorite::{
    FavoriteGroup, FavoriteLimits, FavoriteMembership, FavoriteQuery, FavoriteService,
    GroupOrder, HoleOrder, DEFAULT_GROUP_ID,
};
pub use hole::Hole;
pub use web::WebServer;
