//! Turns raw similarity scores into an ordered recommendation list.

use crate::config::RankingConfig;
use crate::filter_pipeline::FilterPipeline;
use crate::filters::{AlreadyWatchedFilter, MinimumRatingFilter, MinimumVotesFilter};
use crate::types::{Candidate, RankingContext, RecommendationItem};
use anyhow::Result;
use data_loader::Catalog;
use similarity::{Neighbor, SimilarityScoreMatrix};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Profile-mode ranker.
///
/// ## Algorithm
/// For each query row, in profile order:
/// 1. Sort that row's catalog columns by descending similarity (stable, so
///    ties keep catalog order)
/// 2. Run the filter pipeline scoped to the row's query movie
/// 3. Append survivors until `top_n` items are collected overall
///
/// The output is in accumulation order. There is no final global re-sort,
/// and a movie reached from two query rows can appear twice.
pub struct ProfileRanker {
    catalog: Arc<Catalog>,
    pipeline: FilterPipeline,
    top_n: usize,
}

impl ProfileRanker {
    pub fn new(catalog: Arc<Catalog>, config: &RankingConfig) -> Self {
        let pipeline = FilterPipeline::new()
            .add_filter(AlreadyWatchedFilter::new(config.exclusion))
            .add_filter(MinimumRatingFilter::new(catalog.clone(), config.min_rating))
            .add_filter(MinimumVotesFilter::new(catalog.clone(), config.min_vote_count));

        Self {
            catalog,
            pipeline,
            top_n: config.top_n,
        }
    }

    #[instrument(skip_all, fields(user = %context.user_id, rows = scores.rows()))]
    pub fn rank(
        &self,
        scores: &SimilarityScoreMatrix,
        context: &RankingContext,
    ) -> Result<Vec<RecommendationItem>> {
        let mut results = Vec::with_capacity(self.top_n);
        if self.top_n == 0 {
            return Ok(results);
        }

        for (query, row) in scores.iter() {
            let mut candidates: Vec<Candidate> = row
                .iter()
                .enumerate()
                .filter_map(|(column, &similarity)| {
                    self.catalog
                        .get(column)
                        .map(|movie| Candidate::new(column, movie.id, similarity))
                })
                .collect();
            candidates.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

            let admitted = self
                .pipeline
                .apply(candidates, &context.for_query(query.movie_id))?;

            for candidate in admitted {
                let Some(movie) = self.catalog.get(candidate.row) else {
                    continue;
                };
                results.push(RecommendationItem {
                    movie_id: movie.id,
                    title: movie.title.clone(),
                    similarity: candidate.similarity,
                });
                if results.len() == self.top_n {
                    debug!("Reached top_n={} at query movie {}", self.top_n, query.movie_id);
                    return Ok(results);
                }
            }
        }

        debug!("Collected {} recommendations", results.len());
        Ok(results)
    }
}

/// Neighbor-mode ranking: no filtering, similarity = 1 - distance, index order kept.
pub fn rank_neighbors(catalog: &Catalog, neighbors: &[Neighbor]) -> Vec<RecommendationItem> {
    neighbors
        .iter()
        .filter_map(|neighbor| {
            catalog.get(neighbor.row).map(|movie| RecommendationItem {
                movie_id: movie.id,
                title: movie.title.clone(),
                similarity: neighbor.similarity(),
            })
        })
        .collect()
}
