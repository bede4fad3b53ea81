//! Favorite group and membership models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;

/// ID of the per-user default group. It always exists once the user has
/// mutated their favorites, and it cannot be deleted.
pub const DEFAULT_GROUP_ID: i64 = 0;

/// A user-owned, named bucket of favorites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteGroup {
    /// Group ID, unique per user and never reused.
    pub id: i64,
    /// Owner.
    pub user_id: i64,
    /// Display name.
    pub name: String,
    /// Number of favorites currently in the group.
    pub count: i64,
    /// Soft-delete flag.
    pub deleted: bool,
    /// Creation timestamp.
    pub created_at: NaiveDateTime,
    /// Last update timestamp (rename or membership change).
    pub updated_at: NaiveDateTime,
}

impl FavoriteGroup {
    /// Whether this is the protected default group.
    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_GROUP_ID
    }
}

/// Link between a user, a favorited hole, and the group it sits in.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct FavoriteMembership {
    /// Owner.
    pub user_id: i64,
    /// Favorited hole.
    pub hole_id: i64,
    /// Group the favorite currently sits in.
    pub favorite_group_id: i64,
    /// Ordinal within the group. Gaps are allowed; order is ascending.
    pub position: i64,
    /// When the hole was favorited.
    pub created_at: NaiveDateTime,
}

/// Ordering for favorite group listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupOrder {
    /// Group ID descending.
    #[default]
    Id,
    /// Creation time descending, then ID descending.
    TimeCreated,
    /// Update time descending, then ID descending.
    TimeUpdated,
}

impl GroupOrder {
    /// Convert to the query string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupOrder::Id => "id",
            GroupOrder::TimeCreated => "time_created",
            GroupOrder::TimeUpdated => "time_updated",
        }
    }

    /// ORDER BY clause over the `g` alias of `favorite_groups`.
    pub(crate) fn order_by(&self) -> &'static str {
        match self {
            GroupOrder::Id => "g.id DESC",
            GroupOrder::TimeCreated => "g.created_at DESC, g.id DESC",
            GroupOrder::TimeUpdated => "g.updated_at DESC, g.id DESC",
        }
    }
}

impl fmt::Display for GroupOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GroupOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(GroupOrder::Id),
            "time_created" => Ok(GroupOrder::TimeCreated),
            "time_updated" => Ok(GroupOrder::TimeUpdated),
            _ => Err(format!("unknown favorite group order: {s}")),
        }
    }
}

/// Ordering for joined hole listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoleOrder {
    /// Hole ID descending.
    Id,
    /// Time the hole was favorited descending, then hole ID descending.
    TimeCreated,
    /// Hole update time descending, then hole ID descending.
    HoleTimeUpdated,
}

impl HoleOrder {
    /// Convert to the query string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            HoleOrder::Id => "id",
            HoleOrder::TimeCreated => "time_created",
            HoleOrder::HoleTimeUpdated => "hole_time_updated",
        }
    }

    /// ORDER BY clause over the `h` (holes) and `f` (user_favorites) aliases.
    pub(crate) fn order_by(&self) -> &'static str {
        match self {
            HoleOrder::Id => "h.id DESC",
            HoleOrder::TimeCreated => "f.created_at DESC, h.id DESC",
            HoleOrder::HoleTimeUpdated => "h.updated_at DESC, h.id DESC",
        }
    }
}

impl fmt::Display for HoleOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HoleOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(HoleOrder::Id),
            "time_created" => Ok(HoleOrder::TimeCreated),
            "hole_time_updated" => Ok(HoleOrder::HoleTimeUpdated),
            _ => Err(format!("unknown favorite order: {s}")),
        }
    }
}
