//! Request DTOs for the favorites API.

use serde::Deserialize;
use validator::Validate;

use super::validation::{no_control_chars, not_empty_trimmed};
use crate::favorite::DEFAULT_GROUP_ID;

fn default_group_id() -> i64 {
    DEFAULT_GROUP_ID
}

fn group_name(value: &str) -> Result<(), validator::ValidationError> {
    not_empty_trimmed(value)?;
    no_control_chars(value)
}

/// Query string of `GET /user/favorites`.
#[derive(Debug, Default, Deserialize)]
pub struct ListFavoritesQuery {
    /// Return hole ids only instead of joined hole rows.
    #[serde(default)]
    pub plain: bool,
    /// Group to list. Plain listings without it cover every group.
    #[serde(default)]
    pub favorite_group_id: Option<i64>,
    /// `id`, `time_created` or `hole_time_updated`.
    #[serde(default)]
    pub order: Option<String>,
}

/// Query string of `GET /user/favorite_group`.
#[derive(Debug, Default, Deserialize)]
pub struct ListGroupsQuery {
    /// Accepted for compatibility. Group listings have a single shape.
    #[serde(default)]
    pub plain: bool,
    /// `id`, `time_created` or `time_updated`.
    #[serde(default)]
    pub order: Option<String>,
}

/// Add a favorite.
#[derive(Debug, Deserialize, Validate)]
pub struct AddFavoriteRequest {
    pub hole_id: i64,
    #[serde(default = "default_group_id")]
    pub favorite_group_id: i64,
}

/// Replace the members of a group.
#[derive(Debug, Deserialize, Validate)]
pub struct ModifyFavoriteRequest {
    #[validate(length(min = 1, message = "hole_ids must not be empty"))]
    pub hole_ids: Vec<i64>,
    #[serde(default = "default_group_id")]
    pub favorite_group_id: i64,
}

/// Delete a favorite.
#[derive(Debug, Deserialize, Validate)]
pub struct DeleteFavoriteRequest {
    pub hole_id: i64,
    #[serde(default = "default_group_id")]
    pub favorite_group_id: i64,
}

/// Create a favorite group.
#[derive(Debug, Deserialize, Validate)]
pub struct AddGroupRequest {
    #[validate(
        length(min = 1, max = 64, message = "name must be 1-64 characters"),
        custom(function = "group_name")
    )]
    pub name: String,
}

/// Rename a favorite group.
#[derive(Debug, Deserialize, Validate)]
pub struct RenameGroupRequest {
    pub favorite_group_id: i64,
    #[validate(
        length(min = 1, max = 64, message = "name must be 1-64 characters"),
        custom(function = "group_name")
    )]
    pub name: String,
}

/// Delete a favorite group.
#[derive(Debug, Deserialize, Validate)]
pub struct DeleteGroupRequest {
    pub favorite_group_id: i64,
}

/// Move favorites between groups.
#[derive(Debug, Deserialize, Validate)]
pub struct MoveFavoriteRequest {
    #[validate(length(min = 1, message = "hole_ids must not be empty"))]
    pub hole_ids: Vec<i64>,
    pub from_favorite_group_id: i64,
    pub to_favorite_group_id: i64,
}
