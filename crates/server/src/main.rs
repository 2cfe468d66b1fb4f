//! HTTP server for the ReelRecs recommender.
//!
//! Loads the catalog once at startup, then serves profile and neighbor
//! recommendations until shut down.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use data_loader::FileRepository;
use server::api::{AppState, create_router};
use server::{Config, RecommendationOrchestrator};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!("Starting ReelRecs server with {:?}", config);

    let repository = FileRepository::open(&config.data_dir)
        .with_context(|| format!("Failed to open data directory {:?}", config.data_dir))?;

    let orchestrator = RecommendationOrchestrator::new(Arc::new(repository), config.neighbor_count)
        .await
        .context("Failed to build recommendation engine")?;
    info!(
        "Engine ready with {} movies",
        orchestrator.movie_count().await
    );

    let app = create_router(AppState::new(orchestrator, config.ranking()));

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on {}", address);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
