mod admin;
mod auth;
mod config;
mod db;
mod errors;
mod jobs;
mod llm_client;
mod matching;
mod models;
mod resumes;
mod routes;
mod state;
mod users;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::{ModelGateway, SiliconFlowClient};
use crate::routes::{build_router, cors_layer};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job-matching API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize model gateway
    let gateway: Arc<dyn ModelGateway> = Arc::new(SiliconFlowClient::new(
        config.siliconflow_base_url.clone(),
        config.siliconflow_api_key.clone(),
    ));
    info!("Model gateway initialized (model: {})", llm_client::MODEL);

    let cors = cors_layer(&config.cors_origin)?;

    // Build app state
    let state = AppState {
        db,
        gateway,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
