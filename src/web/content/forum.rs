use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::{error, info};

use crate::web::{
    AdminUser, ApiResult, AppState, Success, data,
    models::{ForumPostInput, ForumPostRow},
    responses::{internal_error, not_found},
};

#[derive(Serialize)]
pub struct ForumPostCreated {
    pub success: bool,
    pub post: ForumPostRow,
}

pub async fn list_forum_posts(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ForumPostRow>>> {
    data::fetch_forum_posts(state.pool_ref())
        .await
        .map(Json)
        .map_err(|err| {
            error!(?err, "failed to list forum posts");
            internal_error()
        })
}

pub async fn create_forum_post(
    State(state): State<AppState>,
    Json(input): Json<ForumPostInput>,
) -> ApiResult<Json<ForumPostCreated>> {
    let post = data::insert_forum_post(state.pool_ref(), &input)
        .await
        .map_err(|err| {
            error!(?err, "failed to insert forum post");
            internal_error()
        })?;

    info!(post_id = post.id, "forum post created");
    Ok(Json(ForumPostCreated {
        success: true,
        post,
    }))
}

pub async fn delete_forum_post(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Success>> {
    match data::delete_row(state.pool_ref(), "forum_posts", id).await {
        Ok(true) => {
            info!(post_id = id, admin = %admin.username, "forum post removed");
            Ok(Success::ok())
        }
        Ok(false) => Err(not_found("Forum post not found")),
        Err(err) => {
            error!(?err, post_id = id, "failed to delete forum post");
            Err(internal_error())
        }
    }
}
