//! Favorite service for Treehole.
//!
//! Every mutation runs in one transaction on the write primary and returns the
//! user's favorited hole ids as read inside that same transaction. Any error
//! drops the transaction, rolling everything back.

use tracing::{debug, info};

use super::group_repository::FavoriteGroupRepository;
use super::query::FavoriteQuery;
use super::repository::FavoriteRepository;
use super::types::{FavoriteGroup, DEFAULT_GROUP_ID};
use crate::config::FavoriteConfig;
use crate::db::{Database, DbTransaction};
use crate::{Result, TreeholeError};

/// Maximum length for group names (in characters).
pub const MAX_GROUP_NAME_LENGTH: usize = 64;

/// Validate a group name.
fn validate_group_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TreeholeError::Validation(
            "favorite group name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_GROUP_NAME_LENGTH {
        return Err(TreeholeError::Validation(format!(
            "favorite group name is too long (max {} characters)",
            MAX_GROUP_NAME_LENGTH
        )));
    }
    Ok(())
}

/// Per-user limits applied by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteLimits {
    /// Maximum number of active groups, default group included.
    pub max_groups_per_user: i64,
    /// Name of the implicitly created default group.
    pub default_group_name: String,
}

impl From<&FavoriteConfig> for FavoriteLimits {
    fn from(config: &FavoriteConfig) -> Self {
        Self {
            max_groups_per_user: config.max_groups_per_user,
            default_group_name: config.default_group_name.clone(),
        }
    }
}

impl Default for FavoriteLimits {
    fn default() -> Self {
        Self::from(&FavoriteConfig::default())
    }
}

/// Service for favorite and favorite group mutations.
pub struct FavoriteService<'a> {
    db: &'a Database,
    limits: FavoriteLimits,
}

impl<'a> FavoriteService<'a> {
    /// Create a new FavoriteService.
    pub fn new(db: &'a Database, limits: FavoriteLimits) -> Self {
        Self { db, limits }
    }

    /// Favorite a hole into a group.
    pub async fn add(&self, user_id: i64, hole_id: i64, group_id: i64) -> Result<Vec<i64>> {
        let mut tx = self.begin(user_id).await?;
        FavoriteRepository::add(&mut tx, user_id, hole_id, group_id).await?;
        FavoriteGroupRepository::touch(&mut tx, user_id, group_id).await?;
        let snapshot = self.finish(tx, user_id).await?;

        info!(user_id, hole_id, group_id, "Favorite added");
        Ok(snapshot)
    }

    /// Replace the members of a group with `hole_ids`, in that order.
    pub async fn modify(&self, user_id: i64, hole_ids: &[i64], group_id: i64) -> Result<Vec<i64>> {
        let mut tx = self.begin(user_id).await?;
        FavoriteRepository::replace_group(&mut tx, user_id, hole_ids, group_id).await?;
        FavoriteGroupRepository::touch(&mut tx, user_id, group_id).await?;
        let snapshot = self.finish(tx, user_id).await?;

        info!(user_id, group_id, count = hole_ids.len(), "Favorite group members replaced");
        Ok(snapshot)
    }

    /// Remove a hole from a group.
    pub async fn delete(&self, user_id: i64, hole_id: i64, group_id: i64) -> Result<Vec<i64>> {
        let mut tx = self.begin(user_id).await?;
        FavoriteRepository::remove(&mut tx, user_id, hole_id, group_id).await?;
        FavoriteGroupRepository::touch(&mut tx, user_id, group_id).await?;
        let snapshot = self.finish(tx, user_id).await?;

        info!(user_id, hole_id, group_id, "Favorite deleted");
        Ok(snapshot)
    }

    /// Move holes between groups. Either all of them move or none do.
    pub async fn move_favorites(
        &self,
        user_id: i64,
        hole_ids: &[i64],
        from_group_id: i64,
        to_group_id: i64,
    ) -> Result<Vec<i64>> {
        let mut tx = self.begin(user_id).await?;
        let moved =
            FavoriteRepository::move_to(&mut tx, user_id, hole_ids, from_group_id, to_group_id)
                .await?;
        if moved > 0 {
            FavoriteGroupRepository::touch(&mut tx, user_id, from_group_id).await?;
            FavoriteGroupRepository::touch(&mut tx, user_id, to_group_id).await?;
        }
        let snapshot = self.finish(tx, user_id).await?;

        info!(user_id, from_group_id, to_group_id, moved, "Favorites moved");
        Ok(snapshot)
    }

    /// Create a favorite group.
    pub async fn add_group(&self, user_id: i64, name: &str) -> Result<(FavoriteGroup, Vec<i64>)> {
        validate_group_name(name)?;

        let mut tx = self.begin(user_id).await?;
        let group = FavoriteGroupRepository::create(
            &mut tx,
            user_id,
            name,
            self.limits.max_groups_per_user,
        )
        .await?;
        let snapshot = self.finish(tx, user_id).await?;

        info!(user_id, group_id = group.id, "Favorite group created");
        Ok((group, snapshot))
    }

    /// Rename a favorite group.
    pub async fn rename_group(&self, user_id: i64, group_id: i64, name: &str) -> Result<Vec<i64>> {
        validate_group_name(name)?;

        let mut tx = self.begin(user_id).await?;
        FavoriteGroupRepository::rename(&mut tx, user_id, group_id, name).await?;
        let snapshot = self.finish(tx, user_id).await?;

        info!(user_id, group_id, "Favorite group renamed");
        Ok(snapshot)
    }

    /// Delete a favorite group, moving its favorites to the default group.
    pub async fn delete_group(&self, user_id: i64, group_id: i64) -> Result<Vec<i64>> {
        let mut tx = self.begin(user_id).await?;
        let moved = FavoriteGroupRepository::delete(&mut tx, user_id, group_id).await?;
        if moved > 0 {
            FavoriteGroupRepository::touch(&mut tx, user_id, DEFAULT_GROUP_ID).await?;
        }
        let snapshot = self.finish(tx, user_id).await?;

        info!(user_id, group_id, moved, "Favorite group deleted");
        Ok(snapshot)
    }

    /// Open a write transaction and make sure the default group exists.
    ///
    /// The default group insert is the first statement so the write lock is
    /// held before anything is read.
    async fn begin(&self, user_id: i64) -> Result<DbTransaction> {
        let mut tx = self.db.begin().await?;
        if FavoriteGroupRepository::ensure_default(
            &mut tx,
            user_id,
            &self.limits.default_group_name,
        )
        .await?
        {
            debug!(user_id, "Created default favorite group");
        }
        Ok(tx)
    }

    /// Read the snapshot inside the transaction and commit.
    async fn finish(&self, mut tx: DbTransaction, user_id: i64) -> Result<Vec<i64>> {
        let snapshot = FavoriteQuery::snapshot(&mut tx, user_id).await?;
        tx.commit().await?;
        Ok(snapshot)
    }
}
