mod catalog;
mod config;
mod errors;
mod knowledge_base;
mod models;
mod routes;
mod scoring;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::scoring::scorer::WeightedRuleScorer;
use crate::state::AppState;
use crate::store::persistence::JsonFileBackend;
use crate::store::KnowledgeBaseStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career Advisor API v{}", env!("CARGO_PKG_VERSION"));

    // Load the knowledge base (empty if the file does not exist yet)
    let backend = Arc::new(JsonFileBackend::new(config.knowledge_base_path.clone()));
    let store = Arc::new(KnowledgeBaseStore::open(backend).await?);

    let scorer = Arc::new(WeightedRuleScorer::new(config.answer_policy.clone()));
    info!(
        "Recommendation scorer: answer policy '{}', top {}",
        config.answer_policy, config.recommendation_limit
    );

    let state = AppState {
        store,
        config: config.clone(),
        scorer,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the quiz front-end has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
