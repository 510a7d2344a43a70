pub mod auth;
pub mod content;
pub mod data;
pub mod models;
pub mod pages;
pub mod responses;
pub mod router;
pub mod state;
pub mod uploads;

pub use auth::AdminUser;
pub use responses::{ApiError, ApiResult, Success, json_error};
pub use state::AppState;
