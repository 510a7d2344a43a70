use axum::{
    Json,
    extract::{Path, State},
};
use tracing::{error, info};

use crate::web::{
    AdminUser, ApiResult, AppState, Success, data,
    models::{ContactInput, ContactMessageRow},
    responses::{internal_error, not_found},
};

pub async fn send_contact(
    State(state): State<AppState>,
    Json(input): Json<ContactInput>,
) -> ApiResult<Json<Success>> {
    let message = data::insert_contact_message(state.pool_ref(), &input)
        .await
        .map_err(|err| {
            error!(?err, "failed to store contact message");
            internal_error()
        })?;

    info!(message_id = message.id, "contact message received");
    Ok(Success::ok())
}

pub async fn list_contact_messages(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<ContactMessageRow>>> {
    data::fetch_contact_messages(state.pool_ref())
        .await
        .map(Json)
        .map_err(|err| {
            error!(?err, "failed to list contact messages");
            internal_error()
        })
}

pub async fn delete_contact_message(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Success>> {
    match data::delete_row(state.pool_ref(), "contact_messages", id).await {
        Ok(true) => {
            info!(message_id = id, admin = %admin.username, "contact message deleted");
            Ok(Success::ok())
        }
        Ok(false) => Err(not_found("Contact message not found")),
        Err(err) => {
            error!(?err, message_id = id, "failed to delete contact message");
            Err(internal_error())
        }
    }
}
