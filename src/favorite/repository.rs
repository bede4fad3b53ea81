//! Favorite membership repository for Treehole.
//!
//! Positions are sparse: removing a favorite leaves a gap and nothing is
//! renumbered. Appends always go after the current maximum of the group.

use std::collections::HashSet;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use super::group_repository::FavoriteGroupRepository;
use super::types::FavoriteMembership;
use crate::hole::HoleRepository;
use crate::{Result, TreeholeError};

/// Repository for favorite membership operations.
pub struct FavoriteRepository;

impl FavoriteRepository {
    /// Position one past the current tail of a group.
    pub async fn next_position(
        conn: &mut SqliteConnection,
        user_id: i64,
        group_id: i64,
    ) -> Result<i64> {
        let position: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position), 0) + 1 FROM user_favorites
             WHERE user_id = $1 AND favorite_group_id = $2",
        )
        .bind(user_id)
        .bind(group_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(position)
    }

    /// Get the membership of a hole, whichever group it sits in.
    pub async fn get(
        conn: &mut SqliteConnection,
        user_id: i64,
        hole_id: i64,
    ) -> Result<Option<FavoriteMembership>> {
        let membership = sqlx::query_as::<_, FavoriteMembership>(
            "SELECT user_id, hole_id, favorite_group_id, position, created_at
             FROM user_favorites WHERE user_id = $1 AND hole_id = $2",
        )
        .bind(user_id)
        .bind(hole_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(membership)
    }

    /// Favorite a hole into a group, appending at the group's tail.
    ///
    /// A hole can only sit in one group per user; the unique constraint on
    /// `(user_id, hole_id)` turns a second add into `Conflict`.
    pub async fn add(
        conn: &mut SqliteConnection,
        user_id: i64,
        hole_id: i64,
        group_id: i64,
    ) -> Result<FavoriteMembership> {
        if !FavoriteGroupRepository::is_active(conn, user_id, group_id).await? {
            return Err(TreeholeError::NotFound("favorite group".to_string()));
        }
        if !HoleRepository::exists(conn, hole_id).await? {
            return Err(TreeholeError::NotFound("hole".to_string()));
        }

        let position = Self::next_position(conn, user_id, group_id).await?;
        let membership = sqlx::query_as::<_, FavoriteMembership>(
            "INSERT INTO user_favorites (user_id, hole_id, favorite_group_id, position)
             VALUES ($1, $2, $3, $4)
             RETURNING user_id, hole_id, favorite_group_id, position, created_at",
        )
        .bind(user_id)
        .bind(hole_id)
        .bind(group_id)
        .bind(position)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                TreeholeError::Conflict(format!("hole {hole_id} is already a favorite"))
            }
            other => other.into(),
        })?;

        Ok(membership)
    }

    /// Remove a hole from a group.
    pub async fn remove(
        conn: &mut SqliteConnection,
        user_id: i64,
        hole_id: i64,
        group_id: i64,
    ) -> Result<()> {
        let result = sqlx::query(
            "DELETE FROM user_favorites
             WHERE user_id = $1 AND hole_id = $2 AND favorite_group_id = $3",
        )
        .bind(user_id)
        .bind(hole_id)
        .bind(group_id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TreeholeError::NotFound("favorite".to_string()));
        }
        Ok(())
    }

    /// Move holes from one group to the tail of another, in the listed order.
    ///
    /// Every hole must currently sit in `from`. Returns the number of rows
    /// moved. Not atomic on its own; run inside a transaction.
    pub async fn move_to(
        conn: &mut SqliteConnection,
        user_id: i64,
        hole_ids: &[i64],
        from_group_id: i64,
        to_group_id: i64,
    ) -> Result<u64> {
        if !FavoriteGroupRepository::is_active(conn, user_id, to_group_id).await? {
            return Err(TreeholeError::NotFound("favorite group".to_string()));
        }

        let hole_ids = dedup_ids(hole_ids);
        for &hole_id in &hole_ids {
            let in_from = matches!(
                Self::get(conn, user_id, hole_id).await?,
                Some(m) if m.favorite_group_id == from_group_id
            );
            if !in_from {
                return Err(TreeholeError::NotFound(format!(
                    "favorite {hole_id} in group {from_group_id}"
                )));
            }
        }

        if from_group_id == to_group_id {
            return Ok(0);
        }

        let mut position = Self::next_position(conn, user_id, to_group_id).await?;
        let mut moved = 0;
        for &hole_id in &hole_ids {
            let result = sqlx::query(
                "UPDATE user_favorites SET favorite_group_id = $3, position = $4
                 WHERE user_id = $1 AND hole_id = $2",
            )
            .bind(user_id)
            .bind(hole_id)
            .bind(to_group_id)
            .bind(position)
            .execute(&mut *conn)
            .await?;
            moved += result.rows_affected();
            position += 1;
        }

        Ok(moved)
    }

    /// Make a group's members exactly `hole_ids`, at positions `1..=n`.
    ///
    /// Holes favorited in another group are moved here and keep their
    /// creation time. Members not listed are removed.
    pub async fn replace_group(
        conn: &mut SqliteConnection,
        user_id: i64,
        hole_ids: &[i64],
        group_id: i64,
    ) -> Result<()> {
        if !FavoriteGroupRepository::is_active(conn, user_id, group_id).await? {
            return Err(TreeholeError::NotFound("favorite group".to_string()));
        }

        let hole_ids = dedup_ids(hole_ids);
        for &hole_id in &hole_ids {
            if !HoleRepository::exists(conn, hole_id).await? {
                return Err(TreeholeError::NotFound(format!("hole {hole_id}")));
            }
        }

        let mut delete: QueryBuilder<Sqlite> =
            QueryBuilder::new("DELETE FROM user_favorites WHERE user_id = ");
        delete.push_bind(user_id);
        delete.push(" AND favorite_group_id = ");
        delete.push_bind(group_id);
        if !hole_ids.is_empty() {
            delete.push(" AND hole_id NOT IN (");
            let mut separated = delete.separated(", ");
            for &hole_id in &hole_ids {
                separated.push_bind(hole_id);
            }
            separated.push_unseparated(")");
        }
        delete.build().execute(&mut *conn).await?;

        for (index, &hole_id) in hole_ids.iter().enumerate() {
            let position = index as i64 + 1;
            let updated = sqlx::query(
                "UPDATE user_favorites SET favorite_group_id = $3, position = $4
                 WHERE user_id = $1 AND hole_id = $2",
            )
            .bind(user_id)
            .bind(hole_id)
            .bind(group_id)
            .bind(position)
            .execute(&mut *conn)
            .await?;

            if updated.rows_affected() == 0 {
                sqlx::query(
                    "INSERT INTO user_favorites (user_id, hole_id, favorite_group_id, position)
                     VALUES ($1, $2, $3, $4)",
                )
                .bind(user_id)
                .bind(hole_id)
                .bind(group_id)
                .bind(position)
                .execute(&mut *conn)
                .await?;
            }
        }

        Ok(())
    }

    /// Move every member of `from` to the tail of `to`, keeping relative order.
    ///
    /// Returns the number of rows moved.
    pub async fn reassign_all(
        conn: &mut SqliteConnection,
        user_id: i64,
        from_group_id: i64,
        to_group_id: i64,
    ) -> Result<u64> {
        let offset = Self::next_position(conn, user_id, to_group_id).await? - 1;
        let result = sqlx::query(
            "UPDATE user_favorites SET favorite_group_id = $3, position = position + $4
             WHERE user_id = $1 AND favorite_group_id = $2",
        )
        .bind(user_id)
        .bind(from_group_id)
        .bind(to_group_id)
        .bind(offset)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Favorited hole ids in position order.
    ///
    /// With no group, every favorite of the user is listed by group id and
    /// then position.
    pub async fn hole_ids(
        conn: &mut SqliteConnection,
        user_id: i64,
        group_id: Option<i64>,
    ) -> Result<Vec<i64>> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT hole_id FROM user_favorites WHERE user_id = ");
        query.push_bind(user_id);
        match group_id {
            Some(group_id) => {
                query.push(" AND favorite_group_id = ");
                query.push_bind(group_id);
                query.push(" ORDER BY position");
            }
            None => {
                query.push(" ORDER BY favorite_group_id, position");
            }
        }

        let ids = query
            .build_query_scalar::<i64>()
            .fetch_all(&mut *conn)
            .await?;
        Ok(ids)
    }
}

/// Drop repeated ids, keeping the first occurrence.
fn dedup_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
