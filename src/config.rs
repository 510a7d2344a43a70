use std::{env, path::PathBuf, str::FromStr};

use anyhow::{Context, Result};

const DEFAULT_DATABASE_URL: &str = "sqlite://database.db?mode=rwc";
const DEFAULT_JWT_SECRET: &str = "supersecretkey";
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24 * 7;
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Runtime settings resolved from the process environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    pub frontend_html: PathBuf,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub seed_admin: Option<SeedAdmin>,
}

#[derive(Clone, Debug)]
pub struct SeedAdmin {
    pub username: String,
    pub password: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let seed_admin = match (
            non_empty("SEED_ADMIN_USERNAME"),
            non_empty("SEED_ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(SeedAdmin {
                username: username.trim().to_string(),
                password,
            }),
            _ => None,
        };

        Ok(Self {
            database_url: non_empty("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret: non_empty("JWT_SECRET").unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string()),
            token_ttl_hours: parse_or(
                non_empty("TOKEN_TTL_HOURS"),
                "TOKEN_TTL_HOURS",
                DEFAULT_TOKEN_TTL_HOURS,
            )?,
            upload_dir: non_empty("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./uploads")),
            static_dir: non_empty("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./static")),
            frontend_html: non_empty("FRONTEND_HTML")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("index.html")),
            port: parse_or(non_empty("PORT"), "PORT", DEFAULT_PORT)?,
            max_upload_bytes: parse_or(
                non_empty("MAX_UPLOAD_BYTES"),
                "MAX_UPLOAD_BYTES",
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            seed_admin,
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number, got `{value}`")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = config_from(&[]).expect("config");
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.port, 8000);
        assert_eq!(config.upload_dir, PathBuf::from("./uploads"));
        assert_eq!(config.token_ttl_hours, 168);
        assert!(config.uses_default_secret());
        assert!(config.seed_admin.is_none());
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            ("PORT", "9001"),
            ("JWT_SECRET", "s3cret"),
            ("UPLOAD_DIR", "/tmp/up"),
            ("SEED_ADMIN_USERNAME", " ruva "),
            ("SEED_ADMIN_PASSWORD", "pw"),
        ])
        .expect("config");
        assert_eq!(config.port, 9001);
        assert!(!config.uses_default_secret());
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/up"));
        let seed = config.seed_admin.expect("seed admin");
        assert_eq!(seed.username, "ruva");
    }

    #[test]
    fn seed_admin_requires_both_values() {
        let config = config_from(&[("SEED_ADMIN_USERNAME", "ruva")]).expect("config");
        assert!(config.seed_admin.is_none());
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
