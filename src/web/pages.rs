use std::{io::ErrorKind, path::Path};

use axum::{extract::State, response::Html};
use tracing::error;

use crate::web::{
    ApiResult, AppState,
    responses::{internal_error, not_found},
};

pub async fn home_page(State(state): State<AppState>) -> ApiResult<Html<String>> {
    read_page(&state.config().frontend_html, "Frontend HTML not found").await
}

pub async fn admin_page(State(state): State<AppState>) -> ApiResult<Html<String>> {
    read_page(&state.config().static_dir.join("admin.html"), "Page not found").await
}

pub async fn dashboard_page(State(state): State<AppState>) -> ApiResult<Html<String>> {
    read_page(&state.config().static_dir.join("dashboard.html"), "Page not found").await
}

async fn read_page(path: &Path, missing: &str) -> ApiResult<Html<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(body) => Ok(Html(body)),
        Err(err) if err.kind() == ErrorKind::NotFound => Err(not_found(missing)),
        Err(err) => {
            error!(?err, file = %path.display(), "failed to read page");
            Err(internal_error())
        }
    }
}
