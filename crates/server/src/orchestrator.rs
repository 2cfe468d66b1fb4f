//! # Recommendation Orchestrator
//!
//! This module is the query facade over the engine:
//! 1. Validate the request
//! 2. Take a snapshot of the current engine
//! 3. Profile mode: fetch the user's history, score it, rank it
//! 4. Neighbor mode: resolve the reference movie, search, format
//!
//! Scoring and ranking are CPU-bound and run on the blocking pool so the
//! async workers stay free for I/O.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use data_loader::{CatalogRepository, MovieId};
use pipeline::{ProfileRanker, RankingConfig, RankingContext, RecommendationItem, rank_neighbors};
use similarity::NeighborQuery;

use crate::engine::{Engine, EngineHandle};
use crate::error::{RecommendError, RecommendResult};

/// Main orchestrator shared by every request handler
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    repository: Arc<dyn CatalogRepository>,
    engine: Arc<EngineHandle>,
}

impl RecommendationOrchestrator {
    /// Create a new orchestrator and build the first engine.
    ///
    /// # Arguments
    /// * `repository` - Source of the catalog and user histories
    /// * `neighbor_count` - Neighbors returned by similar-movie requests
    pub async fn new(
        repository: Arc<dyn CatalogRepository>,
        neighbor_count: usize,
    ) -> RecommendResult<Self> {
        let engine = EngineHandle::load(repository.clone(), neighbor_count).await?;
        Ok(Self {
            repository,
            engine: Arc::new(engine),
        })
    }

    /// Number of movies in the current engine
    pub async fn movie_count(&self) -> usize {
        self.engine.snapshot().await.catalog().len()
    }

    /// Profile-mode entry point: recommendations for a user's whole history
    ///
    /// # Returns
    /// Items in accumulation order, at most `config.top_n` of them
    #[instrument(skip(self, config))]
    pub async fn recommend_for_user(
        &self,
        user_id: &str,
        config: &RankingConfig,
    ) -> RecommendResult<Vec<RecommendationItem>> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(RecommendError::InvalidRequest(
                "user_id is required".to_string(),
            ));
        }

        let start_time = Instant::now();
        let engine = self.engine.snapshot().await;
        let repository = self.repository.clone();
        let user_id = user_id.to_string();
        let config = *config;

        let items = tokio::task::spawn_blocking(move || {
            rank_for_user(&engine, repository.as_ref(), &user_id, &config)
        })
        .await??;

        info!(
            "Profile recommendations ready: {} items in {:.2?}",
            items.len(),
            start_time.elapsed()
        );
        Ok(items)
    }

    /// Neighbor-mode entry point: movies closest to one reference movie
    #[instrument(skip(self, query), fields(query = %query))]
    pub async fn recommend_similar_to(
        &self,
        query: NeighborQuery,
    ) -> RecommendResult<Vec<RecommendationItem>> {
        if let NeighborQuery::Title(title) = &query {
            if title.trim().is_empty() {
                return Err(RecommendError::InvalidRequest(
                    "title must not be empty".to_string(),
                ));
            }
        }

        let engine = self.engine.snapshot().await;
        let items = tokio::task::spawn_blocking(move || -> RecommendResult<_> {
            let neighbors = engine.neighbors().search(&query)?;
            Ok(rank_neighbors(engine.catalog(), &neighbors))
        })
        .await??;

        debug!("Returning {} neighbors", items.len());
        Ok(items)
    }

    /// Rebuild the engine from a fresh repository read.
    ///
    /// Returns the new catalog size; a failed rebuild leaves the old engine serving.
    pub async fn reload(&self) -> RecommendResult<usize> {
        self.engine.reload().await
    }
}

fn rank_for_user(
    engine: &Engine,
    repository: &dyn CatalogRepository,
    user_id: &str,
    config: &RankingConfig,
) -> RecommendResult<Vec<RecommendationItem>> {
    let engaged: Vec<MovieId> = repository
        .fetch_user_engaged_ids(user_id)?
        .iter()
        .map(|engaged| engaged.movie_id)
        .collect();
    debug!("User {} has {} engaged movies", user_id, engaged.len());

    let scores = engine.profile().score(&engaged)?;
    let context = RankingContext::new(user_id).with_profile(engaged.iter().copied());

    let ranker = ProfileRanker::new(engine.catalog().clone(), config);
    Ok(ranker.rank(&scores, &context)?)
}
