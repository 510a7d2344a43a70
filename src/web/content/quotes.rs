use axum::{
    Json,
    extract::{Path, State},
};
use tracing::{error, info};

use crate::web::{
    AdminUser, ApiResult, AppState, Success, data,
    models::{QuoteInput, QuoteRow},
    responses::{internal_error, not_found},
};

const NOT_FOUND: &str = "Quote not found";

pub async fn list_quotes(State(state): State<AppState>) -> ApiResult<Json<Vec<QuoteRow>>> {
    data::fetch_quotes(state.pool_ref())
        .await
        .map(Json)
        .map_err(|err| {
            error!(?err, "failed to list quotes");
            internal_error()
        })
}

pub async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<QuoteRow>> {
    match data::fetch_quote(state.pool_ref(), id).await {
        Ok(Some(quote)) => Ok(Json(quote)),
        Ok(None) => Err(not_found(NOT_FOUND)),
        Err(err) => {
            error!(?err, quote_id = id, "failed to load quote");
            Err(internal_error())
        }
    }
}

pub async fn create_quote(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(input): Json<QuoteInput>,
) -> ApiResult<Json<QuoteRow>> {
    let quote = data::insert_quote(state.pool_ref(), &input)
        .await
        .map_err(|err| {
            error!(?err, admin = %admin.username, "failed to insert quote");
            internal_error()
        })?;

    info!(quote_id = quote.id, admin = %admin.username, "quote created");
    Ok(Json(quote))
}

pub async fn update_quote(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(input): Json<QuoteInput>,
) -> ApiResult<Json<QuoteRow>> {
    match data::update_quote(state.pool_ref(), id, &input).await {
        Ok(Some(quote)) => {
            info!(quote_id = id, admin = %admin.username, "quote updated");
            Ok(Json(quote))
        }
        Ok(None) => Err(not_found(NOT_FOUND)),
        Err(err) => {
            error!(?err, quote_id = id, "failed to update quote");
            Err(internal_error())
        }
    }
}

pub async fn delete_quote(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Success>> {
    match data::delete_row(state.pool_ref(), "quotes", id).await {
        Ok(true) => {
            info!(quote_id = id, admin = %admin.username, "quote deleted");
            Ok(Success::ok())
        }
        Ok(false) => Err(not_found(NOT_FOUND)),
        Err(err) => {
            error!(?err, quote_id = id, "failed to delete quote");
            Err(internal_error())
        }
    }
}
