//! # Recommendation Engine
//!
//! An [`Engine`] is everything derived from one catalog read: the frozen
//! catalog, the three per-field vector spaces used in profile mode and the
//! neighbor index over the combined space. It never changes once built.
//!
//! [`EngineHandle`] owns the current engine. Requests take a snapshot
//! (`Arc<Engine>`) and keep using it even if a reload swaps in a new one
//! halfway through the request.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use data_loader::{Catalog, CatalogRepository};
use features::Features;
use similarity::{NeighborIndex, NeighborSearch, ProfileSimilarity};

use crate::error::RecommendResult;

/// Immutable recommendation context for one catalog snapshot
#[derive(Debug)]
pub struct Engine {
    catalog: Arc<Catalog>,
    profile: ProfileSimilarity,
    neighbors: NeighborSearch,
}

impl Engine {
    /// Read the catalog and build every vector space and index over it.
    ///
    /// CPU-bound: call from a blocking context.
    #[instrument(skip(repository))]
    pub fn build(
        repository: &dyn CatalogRepository,
        neighbor_count: usize,
    ) -> RecommendResult<Self> {
        let start = Instant::now();

        let records = repository.fetch_all_movies()?;
        let catalog = Arc::new(Catalog::from_records(records)?);

        let features = Features::extract(&catalog);
        let profile = ProfileSimilarity::new(catalog.clone(), Arc::new(features.profile));
        let index = NeighborIndex::build(features.combined);
        let neighbors =
            NeighborSearch::new(catalog.clone(), Arc::new(index)).with_neighbors(neighbor_count);

        info!(
            "Engine built for {} movies in {:.2?}",
            catalog.len(),
            start.elapsed()
        );

        Ok(Self {
            catalog,
            profile,
            neighbors,
        })
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn profile(&self) -> &ProfileSimilarity {
        &self.profile
    }

    pub fn neighbors(&self) -> &NeighborSearch {
        &self.neighbors
    }
}

/// Holder of the current engine plus what is needed to rebuild it
pub struct EngineHandle {
    repository: Arc<dyn CatalogRepository>,
    neighbor_count: usize,
    current: RwLock<Arc<Engine>>,
}

impl EngineHandle {
    /// Build the first engine. Fails when the catalog cannot be read or is empty.
    pub async fn load(
        repository: Arc<dyn CatalogRepository>,
        neighbor_count: usize,
    ) -> RecommendResult<Self> {
        let engine = Self::build_blocking(repository.clone(), neighbor_count).await?;
        Ok(Self {
            repository,
            neighbor_count,
            current: RwLock::new(Arc::new(engine)),
        })
    }

    /// The engine current at the time of the call
    pub async fn snapshot(&self) -> Arc<Engine> {
        self.current.read().await.clone()
    }

    /// Rebuild from a fresh repository read and swap it in.
    ///
    /// On failure the previous engine stays in place.
    pub async fn reload(&self) -> RecommendResult<usize> {
        match Self::build_blocking(self.repository.clone(), self.neighbor_count).await {
            Ok(engine) => {
                let movies = engine.catalog().len();
                *self.current.write().await = Arc::new(engine);
                info!("Reloaded engine ({} movies)", movies);
                Ok(movies)
            }
            Err(err) => {
                warn!("Reload failed, keeping previous engine: {}", err);
                Err(err)
            }
        }
    }

    async fn build_blocking(
        repository: Arc<dyn CatalogRepository>,
        neighbor_count: usize,
    ) -> RecommendResult<Engine> {
        tokio::task::spawn_blocking(move || Engine::build(repository.as_ref(), neighbor_count))
            .await?
    }
}
