use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::web::{AppState, auth, content, pages};

pub fn build_router(state: AppState) -> Router {
    let config = state.config().clone();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(pages::home_page))
        .route("/admin.html", get(pages::admin_page))
        .route("/dashboard.html", get(pages::dashboard_page))
        .route("/healthz", get(healthz))
        .route("/admin/login", post(auth::login))
        .route(
            "/quotes",
            get(content::list_quotes).post(content::create_quote),
        )
        .route(
            "/quotes/:id",
            get(content::get_quote)
                .put(content::update_quote)
                .delete(content::delete_quote),
        )
        .route(
            "/stories",
            get(content::list_stories).post(content::create_story),
        )
        .route(
            "/stories/:id",
            get(content::get_story)
                .put(content::update_story)
                .delete(content::delete_story),
        )
        .route("/blogs", get(content::list_blogs).post(content::create_blog))
        .route(
            "/blogs/:id",
            get(content::get_blog)
                .put(content::update_blog)
                .delete(content::delete_blog),
        )
        .route("/upload-image", post(content::upload_image))
        .route("/forum/posts", get(content::list_forum_posts))
        .route("/forum/posts/:id", delete(content::delete_forum_post))
        .route("/forum/post", post(content::create_forum_post))
        .route("/contact/send", post(content::send_contact))
        .route("/contact/messages", get(content::list_contact_messages))
        .route(
            "/contact/messages/:id",
            delete(content::delete_contact_message),
        )
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .nest_service("/uploads", ServeDir::new(&config.upload_dir))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}
