mod config;
mod db;
mod errors;
mod jobs;
mod llm_client;
mod models;
mod optimization;
mod render;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::Database;
use crate::jobs::memory::MemoryJobStore;
use crate::jobs::store::{JobStore, PgJobStore};
use crate::llm_client::LlmClient;
use crate::optimization::locks::RecordLocks;
use crate::render::WkhtmltopdfRenderer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume optimizer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the job store; the database connection is opened once here
    let database = match &config.database_url {
        Some(url) => Some(Database::connect(url).await?),
        None => None,
    };
    let store: Arc<dyn JobStore> = match &database {
        Some(db) => Arc::new(PgJobStore::new(db.clone())),
        None => {
            warn!("DATABASE_URL is not set; job cards are kept in memory and lost on restart");
            Arc::new(MemoryJobStore::new())
        }
    };

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.openai_model.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )
    .context("Failed to build LLM HTTP client")?;
    info!("LLM client initialized (model: {})", llm.model());

    let renderer = WkhtmltopdfRenderer::new(config.wkhtmltopdf_path.clone());
    info!("PDF renderer: {}", config.wkhtmltopdf_path);

    let state = AppState {
        store,
        rewriter: Arc::new(llm),
        renderer: Arc::new(renderer),
        optimize_locks: Arc::new(RecordLocks::new()),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = database {
        db.close().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
