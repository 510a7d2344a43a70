use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::web::{
    AdminUser, ApiResult, AppState, json_error,
    uploads::{FileFieldConfig, UploadErrorKind, process_upload_form},
};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg", "bmp", "avif"];

const IMAGE_FIELD: FileFieldConfig<'static> = FileFieldConfig {
    field_name: "file",
    allowed_extensions: IMAGE_EXTENSIONS,
    fallback_stem: "image",
};

#[derive(Serialize)]
pub struct UploadedImage {
    pub url: String,
}

pub async fn upload_image(
    State(state): State<AppState>,
    admin: AdminUser,
    multipart: Multipart,
) -> ApiResult<Json<UploadedImage>> {
    let saved = process_upload_form(multipart, &state.config().upload_dir, &IMAGE_FIELD)
        .await
        .map_err(|err| match err.kind() {
            UploadErrorKind::Rejected => {
                warn!(admin = %admin.username, error = %err, "image upload rejected");
                json_error(StatusCode::BAD_REQUEST, err.message())
            }
            UploadErrorKind::Storage => {
                error!(admin = %admin.username, error = %err, "image upload error");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to upload image")
            }
        })?;

    info!(
        admin = %admin.username,
        admin_id = admin.id,
        original = %saved.original_name,
        stored = %saved.stored_path.display(),
        bytes = saved.file_size,
        "image uploaded"
    );

    Ok(Json(UploadedImage {
        url: format!("/uploads/{}", saved.stored_name),
    }))
}
