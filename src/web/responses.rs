use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

/// Canonical JSON payload for error responses.
#[derive(Debug, Serialize, Clone)]
pub struct ApiMessage {
    pub detail: String,
}

impl ApiMessage {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// `{"success": true}` acknowledgement returned by deletes and public submissions.
#[derive(Debug, Serialize, Clone)]
pub struct Success {
    pub success: bool,
}

impl Success {
    pub fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

pub type ApiError = (StatusCode, Json<ApiMessage>);

pub type ApiResult<T> = Result<T, ApiError>;

/// Helper for controllers that need to return `(StatusCode, Json<ApiMessage>)`.
pub fn json_error(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (status, Json(ApiMessage::new(detail)))
}

pub fn not_found(detail: impl Into<String>) -> ApiError {
    json_error(StatusCode::NOT_FOUND, detail)
}

pub fn unauthorized() -> ApiError {
    json_error(StatusCode::UNAUTHORIZED, "Unauthorized")
}

pub fn internal_error() -> ApiError {
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}
