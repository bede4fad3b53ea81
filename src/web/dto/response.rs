//! Response DTOs for the favorites API.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::favorite::FavoriteGroup;
use crate::hole::Hole;

/// Listing response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Mutation response: a message and the user's favorited hole ids.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    pub data: Vec<i64>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>, data: Vec<i64>) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// A favorite group as returned by the API.
#[derive(Debug, Serialize)]
pub struct FavoriteGroupResponse {
    pub favorite_group_id: i64,
    pub user_id: i64,
    pub name: String,
    /// Number of favorites in the group.
    pub count: i64,
    pub time_created: NaiveDateTime,
    pub time_updated: NaiveDateTime,
}

impl From<FavoriteGroup> for FavoriteGroupResponse {
    fn from(group: FavoriteGroup) -> Self {
        Self {
            favorite_group_id: group.id,
            user_id: group.user_id,
            name: group.name,
            count: group.count,
            time_created: group.created_at,
            time_updated: group.updated_at,
        }
    }
}

/// A favorited hole as returned by the joined listing.
#[derive(Debug, Serialize)]
pub struct HoleResponse {
    pub hole_id: i64,
    pub division_id: i64,
    pub view: i64,
    pub reply: i64,
    pub hidden: bool,
    pub locked: bool,
    pub time_created: NaiveDateTime,
    pub time_updated: NaiveDateTime,
}

impl From<Hole> for HoleResponse {
    fn from(hole: Hole) -> Self {
        Self {
            hole_id: hole.id,
            division_id: hole.division_id,
            view: hole.view,
            reply: hole.reply,
            hidden: hole.hidden,
            locked: hole.locked,
            time_created: hole.created_at,
            time_updated: hole.updated_at,
        }
    }
}
