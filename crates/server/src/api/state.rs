use pipeline::RankingConfig;

use crate::orchestrator::RecommendationOrchestrator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: RecommendationOrchestrator,
    /// Ranking rules applied to every profile request
    pub ranking: RankingConfig,
}

impl AppState {
    pub fn new(orchestrator: RecommendationOrchestrator, ranking: RankingConfig) -> Self {
        Self {
            orchestrator,
            ranking,
        }
    }
}
