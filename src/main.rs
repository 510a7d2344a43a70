mod cli;
mod config;
mod web;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Cli, Command},
    config::AppConfig,
    web::AppState,
};

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(err) = app_main(cli).await {
        error!(?err, "application error");
        std::process::exit(1);
    }
}

async fn app_main(cli: Cli) -> Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::CreateAdmin(credentials) => {
            let state = AppState::new(config).await?;
            cli::create_admin(state.pool_ref(), &credentials).await
        }
        Command::ResetPassword(credentials) => {
            let state = AppState::new(config).await?;
            cli::reset_password(state.pool_ref(), &credentials).await
        }
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    if config.uses_default_secret() {
        warn!("JWT_SECRET is not set; tokens are signed with the built-in development secret");
    }

    for dir in [&config.upload_dir, &config.static_dir] {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let state = AppState::new(config).await?;
    state.ensure_seed_admin().await?;

    let app = web::router::build_router(state);

    info!(%addr, "listening");

    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind listener")?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
