//! Holes (forum posts) as seen by the favorites core.
//!
//! The post subsystem owns the `holes` table. This module only reads it.

use chrono::NaiveDateTime;
use sqlx::SqliteConnection;

use crate::Result;

/// Columns selected for a [`Hole`], qualified with the `h` alias.
pub(crate) const HOLE_COLUMNS: &str =
    "h.id, h.division_id, h.view, h.reply, h.hidden, h.locked, h.created_at, h.updated_at";

/// A forum post.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Hole {
    /// Hole ID.
    pub id: i64,
    /// Division the hole was posted in.
    pub division_id: i64,
    /// View count.
    pub view: i64,
    /// Reply count.
    pub reply: i64,
    /// Hidden by moderation.
    pub hidden: bool,
    /// Closed to new replies.
    pub locked: bool,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
    /// Last update timestamp.
    pub updated_at: NaiveDateTime,
}

/// Read-only access to holes.
pub struct HoleRepository;

impl HoleRepository {
    /// Check whether a hole exists.
    pub async fn exists(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM holes WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(exists)
    }
}
