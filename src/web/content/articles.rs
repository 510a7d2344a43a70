//! Stories and blogs: two tables, one set of handlers parameterised by [`ArticleKind`].

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::web::{
    AdminUser, ApiResult, AppState, Success, data,
    models::{ArticleInput, ArticleKind, ArticleRow},
    responses::{internal_error, not_found},
};

pub async fn list_stories(State(state): State<AppState>) -> ApiResult<Json<Vec<ArticleRow>>> {
    list(&state, ArticleKind::Story).await
}

pub async fn get_story(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ArticleRow>> {
    get(&state, ArticleKind::Story, id).await
}

pub async fn create_story(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(input): Json<ArticleInput>,
) -> ApiResult<Json<Value>> {
    create(&state, &admin, ArticleKind::Story, input).await
}

pub async fn update_story(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(input): Json<ArticleInput>,
) -> ApiResult<Json<Value>> {
    update(&state, &admin, ArticleKind::Story, id, input).await
}

pub async fn delete_story(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Success>> {
    delete(&state, &admin, ArticleKind::Story, id).await
}

pub async fn list_blogs(State(state): State<AppState>) -> ApiResult<Json<Vec<ArticleRow>>> {
    list(&state, ArticleKind::Blog).await
}

pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ArticleRow>> {
    get(&state, ArticleKind::Blog, id).await
}

pub async fn create_blog(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(input): Json<ArticleInput>,
) -> ApiResult<Json<Value>> {
    create(&state, &admin, ArticleKind::Blog, input).await
}

pub async fn update_blog(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(input): Json<ArticleInput>,
) -> ApiResult<Json<Value>> {
    update(&state, &admin, ArticleKind::Blog, id, input).await
}

pub async fn delete_blog(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Success>> {
    delete(&state, &admin, ArticleKind::Blog, id).await
}

async fn list(state: &AppState, kind: ArticleKind) -> ApiResult<Json<Vec<ArticleRow>>> {
    data::fetch_articles(state.pool_ref(), kind)
        .await
        .map(Json)
        .map_err(|err| {
            error!(?err, table = kind.table(), "failed to list articles");
            internal_error()
        })
}

async fn get(state: &AppState, kind: ArticleKind, id: i64) -> ApiResult<Json<ArticleRow>> {
    match data::fetch_article(state.pool_ref(), kind, id).await {
        Ok(Some(row)) => Ok(Json(row)),
        Ok(None) => Err(not_found(kind.not_found_message())),
        Err(err) => {
            error!(?err, table = kind.table(), id, "failed to load article");
            Err(internal_error())
        }
    }
}

async fn create(
    state: &AppState,
    admin: &AdminUser,
    kind: ArticleKind,
    input: ArticleInput,
) -> ApiResult<Json<Value>> {
    let row = data::insert_article(state.pool_ref(), kind, &input)
        .await
        .map_err(|err| {
            error!(?err, table = kind.table(), "failed to insert article");
            internal_error()
        })?;

    info!(table = kind.table(), id = row.id, admin = %admin.username, "article created");
    envelope(kind, &row)
}

async fn update(
    state: &AppState,
    admin: &AdminUser,
    kind: ArticleKind,
    id: i64,
    input: ArticleInput,
) -> ApiResult<Json<Value>> {
    match data::update_article(state.pool_ref(), kind, id, &input).await {
        Ok(Some(row)) => {
            info!(table = kind.table(), id, admin = %admin.username, "article updated");
            envelope(kind, &row)
        }
        Ok(None) => Err(not_found(kind.not_found_message())),
        Err(err) => {
            error!(?err, table = kind.table(), id, "failed to update article");
            Err(internal_error())
        }
    }
}

async fn delete(
    state: &AppState,
    admin: &AdminUser,
    kind: ArticleKind,
    id: i64,
) -> ApiResult<Json<Success>> {
    match data::delete_row(state.pool_ref(), kind.table(), id).await {
        Ok(true) => {
            info!(table = kind.table(), id, admin = %admin.username, "article deleted");
            Ok(Success::ok())
        }
        Ok(false) => {
            warn!(
                table = kind.table(),
                id,
                admin = %admin.username,
                "attempted to delete missing article"
            );
            Err(not_found(kind.not_found_message()))
        }
        Err(err) => {
            error!(?err, table = kind.table(), id, "failed to delete article");
            Err(internal_error())
        }
    }
}

/// `{"success": true, "<story|blog>": {...}}`
fn envelope(kind: ArticleKind, row: &ArticleRow) -> ApiResult<Json<Value>> {
    let record = serde_json::to_value(row).map_err(|err| {
        error!(?err, "failed to serialize article");
        internal_error()
    })?;

    let mut body = Map::new();
    body.insert("success".to_string(), Value::Bool(true));
    body.insert(kind.key().to_string(), record);
    Ok(Json(Value::Object(body)))
}
