mod config;
mod db;
mod errors;
mod models;
mod progress;
mod roadmap;
mod routes;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StorageBackend};
use crate::db::create_pool;
use crate::roadmap::catalog::CatalogRules;
use crate::roadmap::inference::InferenceRules;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::memory::MemoryStorage;
use crate::storage::Storage;

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

    info!("Starting placement roadmap API v{}", env!("CARGO_PKG_VERSION"));

    let storage = build_storage(&config).await?;

    // Rule tables are immutable for the life of the process
    let inference_rules = Arc::new(InferenceRules::builtin());
    let catalog_rules = Arc::new(CatalogRules::builtin());
    info!(
        "Inference rules loaded: {} keyword groups, {} tokens; {} curated skills",
        inference_rules.keyword_rules.len(),
        inference_rules.token_rules.len(),
        catalog_rules.curated.len()
    );

    let state = AppState::new(config.clone(), storage, inference_rules, catalog_rules);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Connects the configured persistence backend.
async fn build_storage(config: &Config) -> Result<Storage> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for the postgres backend"))?;
            let pool = create_pool(database_url, config.database_max_connections).await?;
            Ok(Storage::postgres(pool))
        }
        StorageBackend::Memory => {
            let memory = match &config.company_seed_path {
                Some(path) => MemoryStorage::from_seed_file(path)?,
                None => MemoryStorage::new(),
            };
            info!(
                "Using in-memory storage with {} seeded companies",
                memory.company_count().await
            );
            Ok(Storage::memory(Arc::new(memory)))
        }
    }
}
