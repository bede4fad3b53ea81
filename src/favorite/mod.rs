//! Favorites module for Treehole.
//!
//! Users bookmark holes into named, ordered favorite groups. Each user has a
//! default group (id 0) that is created on their first mutation and can never
//! be deleted. A hole sits in at most one group per user.
//!
//! - [`FavoriteService`] runs mutations in a transaction and returns the
//!   resulting snapshot of favorited hole ids.
//! - [`FavoriteQuery`] serves listings, from read replicas when configured.
//! - [`FavoriteRepository`] and [`FavoriteGroupRepository`] are the storage
//!   layer and take the connection to run on.

mod group_repository;
mod query;
mod repository;
mod service;
mod types;

pub use group_repository::FavoriteGroupRepository;
pub use query::FavoriteQuery;
pub use repository::FavoriteRepository;
pub use service::{FavoriteLimits, FavoriteService, MAX_GROUP_NAME_LENGTH};
pub use types::{FavoriteGroup, FavoriteMembership, GroupOrder, HoleOrder, DEFAULT_GROUP_ID};
