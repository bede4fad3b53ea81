//! Favorite group repository for Treehole.
//!
//! Every function takes the connection to run on, so callers decide whether it
//! is a pooled read connection or an open transaction.

use chrono::NaiveDateTime;
use sqlx::SqliteConnection;

use super::repository::FavoriteRepository;
use super::types::{FavoriteGroup, GroupOrder, DEFAULT_GROUP_ID};
use crate::db::SQL_NOW;
use crate::{Result, TreeholeError};

const GROUP_COLUMNS: &str = "g.user_id, g.id, g.name, g.deleted, g.created_at, g.updated_at,
    (SELECT COUNT(*) FROM user_favorites f
     WHERE f.user_id = g.user_id AND f.favorite_group_id = g.id) AS count";

/// Repository for favorite group operations.
pub struct FavoriteGroupRepository;

impl FavoriteGroupRepository {
    /// Create the default group for a user if it does not exist yet.
    ///
    /// Returns true if the group was created.
    pub async fn ensure_default(
        conn: &mut SqliteConnection,
        user_id: i64,
        name: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO favorite_groups (user_id, id, name) VALUES ($1, $2, $3)
             ON CONFLICT (user_id, id) DO NOTHING",
        )
        .bind(user_id)
        .bind(DEFAULT_GROUP_ID)
        .bind(name)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Get a group by ID, including soft-deleted ones.
    pub async fn get(
        conn: &mut SqliteConnection,
        user_id: i64,
        group_id: i64,
    ) -> Result<Option<FavoriteGroup>> {
        let query = format!(
            "SELECT {GROUP_COLUMNS} FROM favorite_groups g WHERE g.user_id = $1 AND g.id = $2"
        );
        let row: Option<GroupRow> = sqlx::query_as(&query)
            .bind(user_id)
            .bind(group_id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row.map(GroupRow::into_group))
    }

    /// Check whether the user owns an active group with this ID.
    pub async fn is_active(conn: &mut SqliteConnection, user_id: i64, group_id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM favorite_groups
             WHERE user_id = $1 AND id = $2 AND deleted = 0)",
        )
        .bind(user_id)
        .bind(group_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(exists)
    }

    /// Count a user's active groups, default group included.
    pub async fn count_active(conn: &mut SqliteConnection, user_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM favorite_groups WHERE user_id = $1 AND deleted = 0",
        )
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(count)
    }

    /// Create a new group.
    ///
    /// Fails with `Permission` once the user holds `max_groups` active groups.
    /// IDs continue after the highest ever used, deleted groups included.
    pub async fn create(
        conn: &mut SqliteConnection,
        user_id: i64,
        name: &str,
        max_groups: i64,
    ) -> Result<FavoriteGroup> {
        if Self::count_active(conn, user_id).await? >= max_groups {
            return Err(TreeholeError::Permission(format!(
                "favorite group limit reached ({max_groups})"
            )));
        }

        let id: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(id), $2) + 1 FROM favorite_groups WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(DEFAULT_GROUP_ID)
        .fetch_one(&mut *conn)
        .await?;

        sqlx::query("INSERT INTO favorite_groups (user_id, id, name) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(id)
            .bind(name)
            .execute(&mut *conn)
            .await?;

        Self::get(conn, user_id, id)
            .await?
            .ok_or_else(|| TreeholeError::NotFound("favorite group".to_string()))
    }

    /// Rename an active group.
    pub async fn rename(
        conn: &mut SqliteConnection,
        user_id: i64,
        group_id: i64,
        name: &str,
    ) -> Result<FavoriteGroup> {
        let query = format!(
            "UPDATE favorite_groups SET name = $3, updated_at = {SQL_NOW}
             WHERE user_id = $1 AND id = $2 AND deleted = 0"
        );
        let result = sqlx::query(&query)
            .bind(user_id)
            .bind(group_id)
            .bind(name)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TreeholeError::NotFound("favorite group".to_string()));
        }

        Self::get(conn, user_id, group_id)
            .await?
            .ok_or_else(|| TreeholeError::NotFound("favorite group".to_string()))
    }

    /// Soft-delete a group, moving its favorites to the default group.
    ///
    /// The default group must already exist. Returns the number of favorites
    /// moved. Run inside a transaction so the move and the delete land together.
    pub async fn delete(conn: &mut SqliteConnection, user_id: i64, group_id: i64) -> Result<u64> {
        if group_id == DEFAULT_GROUP_ID {
            return Err(TreeholeError::Permission(
                "the default favorite group cannot be deleted".to_string(),
            ));
        }
        if !Self::is_active(conn, user_id, group_id).await? {
            return Err(TreeholeError::NotFound("favorite group".to_string()));
        }

        let moved =
            FavoriteRepository::reassign_all(conn, user_id, group_id, DEFAULT_GROUP_ID).await?;

        let query = format!(
            "UPDATE favorite_groups SET deleted = 1, updated_at = {SQL_NOW}
             WHERE user_id = $1 AND id = $2"
        );
        sqlx::query(&query)
            .bind(user_id)
            .bind(group_id)
            .execute(&mut *conn)
            .await?;

        Ok(moved)
    }

    /// Bump a group's `updated_at`.
    pub async fn touch(conn: &mut SqliteConnection, user_id: i64, group_id: i64) -> Result<()> {
        let query = format!(
            "UPDATE favorite_groups SET updated_at = {SQL_NOW} WHERE user_id = $1 AND id = $2"
        );
        sqlx::query(&query)
            .bind(user_id)
            .bind(group_id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// List a user's active groups in the given order.
    pub async fn list(
        conn: &mut SqliteConnection,
        user_id: i64,
        order: GroupOrder,
    ) -> Result<Vec<FavoriteGroup>> {
        let query = format!(
            "SELECT {GROUP_COLUMNS} FROM favorite_groups g
             WHERE g.user_id = $1 AND g.deleted = 0
             ORDER BY {}",
            order.order_by()
        );
        let rows: Vec<GroupRow> = sqlx::query_as(&query)
            .bind(user_id)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows.into_iter().map(GroupRow::into_group).collect())
    }
}

/// Internal struct for mapping database rows to FavoriteGroup.
#[derive(sqlx::FromRow)]
struct GroupRow {
    user_id: i64,
    id: i64,
    name: String,
    deleted: bool,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    count: i64,
}

impl GroupRow {
    fn into_group(self) -> FavoriteGroup {
        FavoriteGroup {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            count: self.count,
            deleted: self.deleted,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
