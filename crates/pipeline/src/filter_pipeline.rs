//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::traits::Filter;
use crate::types::{Candidate, RankingContext};
use anyhow::Result;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(AlreadyWatchedFilter::new(ExclusionPolicy::QueryRow))
///     .add_filter(MinimumRatingFilter::new(catalog.clone(), 5.0))
///     .add_filter(MinimumVotesFilter::new(catalog.clone(), 1000));
///
/// let filtered = pipeline.apply(candidates, &context)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Number of filters in the pipeline
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Add a filter to the pipeline (builder pattern).
    ///
    /// # Arguments
    /// * `filter` - Any type implementing the Filter trait
    ///
    /// # Returns
    /// Self for method chaining
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Apply all filters in sequence to the candidates.
    ///
    /// ## Algorithm
    /// 1. Start with the input candidates
    /// 2. For each filter in order:
    ///    a. Log filter name and input count
    ///    b. Apply the filter
    ///    c. Log output count
    /// 3. Return final filtered set
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter
    /// * `context` - Profile and query movie for filtering decisions
    ///
    /// # Returns
    /// * `Ok(Vec<Candidate>)` - The filtered candidates after all filters
    /// * `Err` - If any filter fails
    pub fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &RankingContext,
    ) -> Result<Vec<Candidate>> {
        let mut current = candidates;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, context)?;
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExclusionPolicy;
    use crate::filters::{AlreadyWatchedFilter, MinimumRatingFilter, MinimumVotesFilter};
    use data_loader::{Catalog, MovieRecord};
    use std::sync::Arc;

    fn movie(id: u32, rating: f32, vote_count: u32) -> MovieRecord {
        MovieRecord {
            id,
            title: format!("Movie {id}"),
            genres: vec![],
            keywords: String::new(),
            overview: String::new(),
            rating,
            vote_count,
        }
    }

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        let context = RankingContext::new("u1");

        let candidates = vec![Candidate::new(0, 1, 0.9), Candidate::new(1, 2, 0.8)];

        let filtered = pipeline.apply(candidates, &context).unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_single_filter() {
        let context = RankingContext::new("u1").with_profile([1]).for_query(1);

        let pipeline =
            FilterPipeline::new().add_filter(AlreadyWatchedFilter::new(ExclusionPolicy::QueryRow));

        let candidates = vec![Candidate::new(0, 1, 0.9), Candidate::new(1, 2, 0.8)];

        let filtered = pipeline.apply(candidates, &context).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].movie_id, 2);
    }

    #[test]
    fn test_chained_filters_keep_order() {
        let catalog = Arc::new(
            Catalog::from_records(vec![
                movie(1, 7.0, 2000),
                movie(2, 6.0, 1500),
                movie(3, 3.0, 5000),
                movie(4, 9.0, 4000),
            ])
            .unwrap(),
        );
        let context = RankingContext::new("u1").with_profile([1]).for_query(1);

        let pipeline = FilterPipeline::new()
            .add_filter(AlreadyWatchedFilter::default())
            .add_filter(MinimumRatingFilter::new(catalog.clone(), 5.0))
            .add_filter(MinimumVotesFilter::new(catalog, 1000));
        assert_eq!(pipeline.len(), 3);

        let candidates = vec![
            Candidate::new(3, 4, 0.2),
            Candidate::new(0, 1, 1.0),
            Candidate::new(2, 3, 0.7),
            Candidate::new(1, 2, 0.1),
        ];

        let filtered = pipeline.apply(candidates, &context).unwrap();
        let ids: Vec<u32> = filtered.iter().map(|c| c.movie_id).collect();
        assert_eq!(ids, vec![4, 2]);
    }
}
