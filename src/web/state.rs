use std::{str::FromStr, sync::Arc};

use anyhow::{Context, Result, anyhow};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::info;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pool: SqlitePool,
    config: Arc<AppConfig>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .with_context(|| format!("invalid DATABASE_URL `{}`", config.database_url))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .context("failed to open SQLite database")?;

        Self::with_pool(pool, config).await
    }

    /// Wraps an existing pool, applying migrations first.
    pub async fn with_pool(pool: SqlitePool, config: AppConfig) -> Result<Self> {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run database migrations")?;
        upgrade_legacy_quotes(&pool).await?;

        Ok(Self {
            pool,
            config: Arc::new(config),
        })
    }

    pub async fn ensure_seed_admin(&self) -> Result<()> {
        let Some(seed) = self.config.seed_admin.as_ref() else {
            return Ok(());
        };

        let has_admin: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM admins)")
            .fetch_one(&self.pool)
            .await
            .context("failed to verify admin presence")?;

        if !has_admin {
            let password_hash = crate::web::auth::hash_password(&seed.password)
                .map_err(|err| anyhow!("failed to hash seed admin password: {err}"))?;

            sqlx::query("INSERT INTO admins (username, password_hash) VALUES (?, ?)")
                .bind(&seed.username)
                .bind(password_hash)
                .execute(&self.pool)
                .await
                .context("failed to insert seed admin")?;

            info!(username = %seed.username, "seeded admin account from environment");
        }

        Ok(())
    }

    pub fn pool_ref(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Databases created before quotes carried an author and image only have `(id, text)`;
/// `CREATE TABLE IF NOT EXISTS` leaves such a table untouched, so add what is missing.
async fn upgrade_legacy_quotes(pool: &SqlitePool) -> Result<()> {
    let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info('quotes')")
        .fetch_all(pool)
        .await
        .context("failed to inspect quotes table")?;

    for column in ["author", "image_url"] {
        if columns.iter().any(|existing| existing == column) {
            continue;
        }
        sqlx::query(&format!("ALTER TABLE quotes ADD COLUMN {column} TEXT"))
            .execute(pool)
            .await
            .with_context(|| format!("failed to add quotes.{column}"))?;
        info!(column, "added missing column to legacy quotes table");
    }

    Ok(())
}
