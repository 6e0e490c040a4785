//! Blog list server library
//!
//! Accounts, token-authenticated post management and statistics over
//! every stored post, served as JSON over HTTP.

pub mod blogs;
pub mod core;

use anyhow::Context;
use axum::{http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::blogs::PostManager;
use crate::core::auth::token::TokenService;
use crate::core::auth::{AccountManager, Credentials};
use crate::core::{AppState, ServerConfig};

/// Open the database described by `config` and assemble shared state.
pub async fn build_state(config: &ServerConfig) -> anyhow::Result<AppState> {
    config.ensure_dirs().await?;

    let pool = crate::core::db::connect(&config.db_path())
        .await
        .context("Failed to open blog database")?;

    Ok(AppState {
        accounts: Arc::new(AccountManager::new(pool.clone())),
        posts: Arc::new(PostManager::new(pool)),
        tokens: Arc::new(TokenService::new(&config.secret, config.token_ttl_secs)),
        credentials: Arc::new(Credentials::new(config.bcrypt_cost)),
    })
}

/// The full application router with middleware applied.
pub fn app(state: AppState) -> Router {
    crate::core::router(state.clone())
        .route("/health", get(health_check))
        .fallback(unknown_endpoint)
        .with_state(state)
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

pub async fn run() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        // Already set, ignore
    }

    info!("=== Blog List Server ===");

    let config = ServerConfig::from_env()?;
    info!("Database: {:?}", config.db_path());

    let state = build_state(&config).await?;
    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK - Blog List Server"
}

async fn unknown_endpoint() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "unknown endpoint" })),
    )
}
