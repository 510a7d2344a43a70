use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum::{
    Json, async_trait,
    extract::{FromRequestParts, Query, State},
    http::{StatusCode, request::Parts},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::web::{
    ApiError, ApiResult, AppState, json_error,
    responses::{internal_error, unauthorized},
};

/// Longest password prefix that takes part in hashing, kept from the legacy bcrypt scheme.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Clone, sqlx::FromRow)]
pub struct DbAdminAuth {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// An admin whose bearer token was verified against the signing secret and the `admins` table.
#[derive(Clone, Debug)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
}

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let admin = match fetch_admin_by_username(state.pool_ref(), &request.username).await {
        Ok(Some(admin)) => admin,
        Ok(None) => {
            warn!(username = %request.username, "failed login attempt for unknown admin");
            return Err(invalid_credentials());
        }
        Err(err) => {
            error!(?err, username = %request.username, "unexpected login error");
            return Err(internal_error());
        }
    };

    if !verify_password(&request.password, &admin.password_hash) {
        warn!(username = %request.username, "failed login attempt: wrong password");
        return Err(invalid_credentials());
    }

    let token = issue_token(&admin.username, state.config()).map_err(|err| {
        error!(?err, username = %admin.username, "failed to sign admin token");
        internal_error()
    })?;

    info!(username = %admin.username, "admin logged in");
    Ok(Json(LoginResponse { token }))
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = extract_token(parts, state).await else {
            warn!(path = %parts.uri.path(), "unauthorized access attempt: missing token");
            return Err(unauthorized());
        };

        let claims = verify_token(&token, state.config()).map_err(|err| {
            warn!(path = %parts.uri.path(), error = %err, "unauthorized access attempt");
            unauthorized()
        })?;

        match fetch_admin_by_username(state.pool_ref(), &claims.username).await {
            Ok(Some(admin)) => Ok(AdminUser {
                id: admin.id,
                username: admin.username,
            }),
            Ok(None) => {
                warn!(username = %claims.username, "unauthorized access attempt: admin no longer exists");
                Err(unauthorized())
            }
            Err(err) => {
                error!(?err, "failed to resolve admin for token");
                Err(internal_error())
            }
        }
    }
}

/// Bearer header first; the legacy `?token=` query parameter is accepted as a fallback.
async fn extract_token(parts: &mut Parts, state: &AppState) -> Option<String> {
    if let Ok(TypedHeader(Authorization(bearer))) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await
    {
        return Some(bearer.token().to_string());
    }

    Query::<TokenQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(query)| query.token)
        .filter(|token| !token.is_empty())
}

pub fn issue_token(username: &str, config: &AppConfig) -> jsonwebtoken::errors::Result<String> {
    let now = Utc::now();
    let claims = Claims {
        username: username.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(config.token_ttl_hours)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, config: &AppConfig) -> jsonwebtoken::errors::Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(truncate_password(password).as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed = PasswordHash::new(password_hash);
    match parsed {
        Ok(hash) => Argon2::default()
            .verify_password(truncate_password(password).as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

fn truncate_password(password: &str) -> &str {
    if password.len() <= MAX_PASSWORD_BYTES {
        return password;
    }
    let mut end = MAX_PASSWORD_BYTES;
    while !password.is_char_boundary(end) {
        end -= 1;
    }
    &password[..end]
}

pub async fn fetch_admin_by_username(
    pool: &SqlitePool,
    username: &str,
) -> sqlx::Result<Option<DbAdminAuth>> {
    sqlx::query_as::<_, DbAdminAuth>(
        "SELECT id, username, password_hash FROM admins WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

fn invalid_credentials() -> ApiError {
    json_error(StatusCode::UNAUTHORIZED, "Invalid credentials")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(secret: &str, ttl_hours: i64) -> AppConfig {
        let mut config = AppConfig::from_lookup(|_| None).expect("config");
        config.jwt_secret = secret.to_string();
        config.token_ttl_hours = ttl_hours;
        config
    }

    #[test]
    fn password_hash_verifies_only_the_same_password() {
        let hash = hash_password("Ruva123$").expect("hash");
        assert!(verify_password("Ruva123$", &hash));
        assert!(!verify_password("ruva123$", &hash));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn passwords_are_compared_on_their_first_72_bytes() {
        let long = "a".repeat(80);
        let hash = hash_password(&long).expect("hash");
        assert!(verify_password(&"a".repeat(72), &hash));
        assert!(!verify_password(&"a".repeat(71), &hash));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let password = format!("{}é", "a".repeat(71));
        assert_eq!(truncate_password(&password), "a".repeat(71));
    }

    #[test]
    fn issued_token_round_trips() {
        let config = test_config("secret-one", 1);
        let token = issue_token("ruva", &config).expect("token");
        let claims = verify_token(&token, &config).expect("claims");
        assert_eq!(claims.username, "ruva");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = issue_token("ruva", &test_config("secret-one", 1)).expect("token");
        assert!(verify_token(&token, &test_config("secret-two", 1)).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config("secret-one", -2);
        let token = issue_token("ruva", &config).expect("token");
        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(verify_token("invalid.token.here", &test_config("s", 1)).is_err());
    }
}
