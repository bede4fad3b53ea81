//! Favorite and favorite group handlers.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::favorite::{FavoriteQuery, FavoriteService, GroupOrder, HoleOrder, DEFAULT_GROUP_ID};
use crate::web::dto::{
    AddFavoriteRequest, AddGroupRequest, ApiResponse, DeleteFavoriteRequest, DeleteGroupRequest,
    FavoriteGroupResponse, HoleResponse, ListFavoritesQuery, ListGroupsQuery, MessageResponse,
    ModifyFavoriteRequest, MoveFavoriteRequest, RenameGroupRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::UserId;

type MutationResult = Result<(StatusCode, Json<MessageResponse>), ApiError>;

fn service(state: &AppState) -> FavoriteService<'_> {
    FavoriteService::new(&state.db, state.limits.clone())
}

fn respond(status: StatusCode, message: &str, snapshot: Vec<i64>) -> MutationResult {
    Ok((status, Json(MessageResponse::new(message, snapshot))))
}

/// GET /api/user/favorites - List favorites, as ids or as holes.
///
/// Without `order` holes are listed by favorite time. An unknown order
/// leaves the ordering to the database.
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Query(query): Query<ListFavoritesQuery>,
) -> Result<Response, ApiError> {
    let facade = FavoriteQuery::new(&state.db);

    if query.plain {
        let ids = facade.hole_ids(user_id, query.favorite_group_id).await?;
        return Ok(Json(ApiResponse::new(ids)).into_response());
    }

    let order = match query.order.as_deref() {
        None => Some(HoleOrder::TimeCreated),
        Some(raw) => match HoleOrder::from_str(raw) {
            Ok(order) => Some(order),
            Err(e) => {
                tracing::debug!("{}", e);
                None
            }
        },
    };
    let group_id = query.favorite_group_id.unwrap_or(DEFAULT_GROUP_ID);
    let holes: Vec<HoleResponse> = facade
        .holes(user_id, Some(group_id), order)
        .await?
        .into_iter()
        .map(HoleResponse::from)
        .collect();

    Ok(Json(holes).into_response())
}

/// POST /api/user/favorites - Add a favorite.
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    ValidatedJson(req): ValidatedJson<AddFavoriteRequest>,
) -> MutationResult {
    let snapshot = service(&state)
        .add(user_id, req.hole_id, req.favorite_group_id)
        .await?;
    respond(StatusCode::CREATED, "收藏成功", snapshot)
}

/// PUT /api/user/favorites - Replace the members of a group.
pub async fn modify_favorites(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    ValidatedJson(req): ValidatedJson<ModifyFavoriteRequest>,
) -> MutationResult {
    let snapshot = service(&state)
        .modify(user_id, &req.hole_ids, req.favorite_group_id)
        .await?;
    respond(StatusCode::CREATED, "修改成功", snapshot)
}

/// DELETE /api/user/favorites - Delete a favorite.
pub async fn delete_favorite(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    ValidatedJson(req): ValidatedJson<DeleteFavoriteRequest>,
) -> MutationResult {
    let snapshot = service(&state)
        .delete(user_id, req.hole_id, req.favorite_group_id)
        .await?;
    respond(StatusCode::OK, "删除成功", snapshot)
}

/// GET /api/user/favorite_group - List favorite groups.
pub async fn list_groups(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    Query(query): Query<ListGroupsQuery>,
) -> Result<Json<ApiResponse<Vec<FavoriteGroupResponse>>>, ApiError> {
    let order = query
        .order
        .as_deref()
        .and_then(|raw| GroupOrder::from_str(raw).ok())
        .unwrap_or_default();

    let groups: Vec<FavoriteGroupResponse> = FavoriteQuery::new(&state.db)
        .groups(user_id, order)
        .await?
        .into_iter()
        .map(FavoriteGroupResponse::from)
        .collect();

    Ok(Json(ApiResponse::new(groups)))
}

/// POST /api/user/favorite_group - Create a favorite group.
pub async fn add_group(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    ValidatedJson(req): ValidatedJson<AddGroupRequest>,
) -> MutationResult {
    let (_, snapshot) = service(&state).add_group(user_id, &req.name).await?;
    respond(StatusCode::CREATED, "添加成功", snapshot)
}

/// PUT /api/user/favorite_group - Rename a favorite group.
pub async fn rename_group(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    ValidatedJson(req): ValidatedJson<RenameGroupRequest>,
) -> MutationResult {
    let snapshot = service(&state)
        .rename_group(user_id, req.favorite_group_id, &req.name)
        .await?;
    respond(StatusCode::CREATED, "修改成功", snapshot)
}

/// DELETE /api/user/favorite_group - Delete a favorite group.
pub async fn delete_group(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    ValidatedJson(req): ValidatedJson<DeleteGroupRequest>,
) -> MutationResult {
    let snapshot = service(&state)
        .delete_group(user_id, req.favorite_group_id)
        .await?;
    respond(StatusCode::OK, "删除成功", snapshot)
}

/// PUT /api/user/favorite_group/move - Move favorites between groups.
pub async fn move_favorites(
    State(state): State<Arc<AppState>>,
    UserId(user_id): UserId,
    ValidatedJson(req): ValidatedJson<MoveFavoriteRequest>,
) -> MutationResult {
    let snapshot = service(&state)
        .move_favorites(
            user_id,
            &req.hole_ids,
            req.from_favorite_group_id,
            req.to_favorite_group_id,
        )
        .await?;
    respond(StatusCode::OK, "移动成功", snapshot)
}
