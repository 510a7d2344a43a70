use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use sqlx::SqlitePool;
use tracing::info;

use crate::web::auth::hash_password;

#[derive(Parser, Debug)]
#[command(author, version, about = "QuoteMe content backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Create the admin account, replacing any existing admin with the same username.
    CreateAdmin(Credentials),
    /// Set a new password for an existing admin.
    ResetPassword(Credentials),
}

#[derive(Args, Debug)]
pub struct Credentials {
    #[arg(long)]
    pub username: String,
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn create_admin(pool: &SqlitePool, credentials: &Credentials) -> Result<()> {
    let username = credentials.username.trim();
    if username.is_empty() {
        bail!("username must not be empty");
    }
    let password = credentials.password.as_str();
    if password.trim().is_empty() {
        bail!("password must not be empty");
    }

    let password_hash =
        hash_password(password).map_err(|err| anyhow!("failed to hash password: {err}"))?;

    let mut tx = pool.begin().await.context("failed to open transaction")?;

    let removed = sqlx::query("DELETE FROM admins WHERE username = ?")
        .bind(username)
        .execute(&mut *tx)
        .await
        .context("failed to remove existing admin")?
        .rows_affected();

    sqlx::query("INSERT INTO admins (username, password_hash) VALUES (?, ?)")
        .bind(username)
        .bind(password_hash)
        .execute(&mut *tx)
        .await
        .context("failed to insert admin")?;

    tx.commit().await.context("failed to commit admin creation")?;

    if removed > 0 {
        info!(username, "existing admin replaced");
    } else {
        info!(username, "admin created");
    }
    Ok(())
}

/// Unlike `create_admin`, surrounding whitespace is stripped from the new password, the way
/// the interactive reset prompt always has.
pub async fn reset_password(pool: &SqlitePool, credentials: &Credentials) -> Result<()> {
    let username = credentials.username.trim();
    let password = credentials.password.trim();
    if password.is_empty() {
        bail!("no password entered, reset cancelled");
    }

    let password_hash =
        hash_password(password).map_err(|err| anyhow!("failed to hash password: {err}"))?;

    let updated = sqlx::query("UPDATE admins SET password_hash = ? WHERE username = ?")
        .bind(password_hash)
        .bind(username)
        .execute(pool)
        .await
        .context("failed to update admin password")?
        .rows_affected();

    if updated == 0 {
        bail!("no admin found with username '{username}'");
    }

    info!(username, "admin password reset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::{
        config::AppConfig,
        web::{
            AppState,
            auth::{fetch_admin_by_username, verify_password},
        },
    };

    async fn pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        let config = AppConfig::from_lookup(|_| None).expect("config");
        AppState::with_pool(pool, config)
            .await
            .expect("state")
            .pool_ref()
            .clone()
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn create_admin_replaces_existing_account() {
        let pool = pool().await;

        create_admin(&pool, &credentials("Ruva", "first"))
            .await
            .expect("create");
        create_admin(&pool, &credentials("Ruva", "second"))
            .await
            .expect("recreate");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(count, 1);

        let admin = fetch_admin_by_username(&pool, "Ruva")
            .await
            .expect("query")
            .expect("admin");
        assert!(verify_password("second", &admin.password_hash));
        assert!(!verify_password("first", &admin.password_hash));
    }

    #[tokio::test]
    async fn reset_password_requires_existing_admin() {
        let pool = pool().await;

        let err = reset_password(&pool, &credentials("ghost", "pw"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("ghost"));

        create_admin(&pool, &credentials("Ruva", "old"))
            .await
            .expect("create");
        reset_password(&pool, &credentials("Ruva", "new"))
            .await
            .expect("reset");

        let admin = fetch_admin_by_username(&pool, "Ruva")
            .await
            .expect("query")
            .expect("admin");
        assert!(verify_password("new", &admin.password_hash));
    }

    #[tokio::test]
    async fn create_admin_keeps_password_whitespace() {
        let pool = pool().await;

        create_admin(&pool, &credentials("Ruva", " pass word "))
            .await
            .expect("create");

        let admin = fetch_admin_by_username(&pool, "Ruva")
            .await
            .expect("query")
            .expect("admin");
        assert!(verify_password(" pass word ", &admin.password_hash));
        assert!(!verify_password("pass word", &admin.password_hash));
    }

    #[tokio::test]
    async fn reset_password_strips_surrounding_whitespace() {
        let pool = pool().await;

        create_admin(&pool, &credentials("Ruva", "old"))
            .await
            .expect("create");
        reset_password(&pool, &credentials("Ruva", "  fresh  "))
            .await
            .expect("reset");

        let admin = fetch_admin_by_username(&pool, "Ruva")
            .await
            .expect("query")
            .expect("admin");
        assert!(verify_password("fresh", &admin.password_hash));
    }

    #[tokio::test]
    async fn empty_password_is_refused() {
        let pool = pool().await;
        assert!(create_admin(&pool, &credentials("Ruva", "  ")).await.is_err());
        assert!(reset_password(&pool, &credentials("Ruva", "")).await.is_err());
    }
}
