//! Filter to ensure minimum quality threshold.
//!
//! Removes movies whose audience rating is at or below the bar.

use crate::traits::Filter;
use crate::types::{Candidate, RankingContext};
use anyhow::Result;
use data_loader::Catalog;
use std::sync::Arc;

/// Removes candidates rated at or below `min_rating`.
///
/// ## Algorithm
/// For each candidate:
/// 1. Look up its record in the Catalog
/// 2. Keep it only if rating > min_rating
pub struct MinimumRatingFilter {
    catalog: Arc<Catalog>,
    min_rating: f32,
}

impl MinimumRatingFilter {
    /// Create a new MinimumRatingFilter.
    ///
    /// # Arguments
    /// * `catalog` - Shared catalog snapshot for record lookups
    /// * `min_rating` - Rating a movie must exceed (typically 5)
    pub fn new(catalog: Arc<Catalog>, min_rating: f32) -> Self {
        Self {
            catalog,
            min_rating,
        }
    }
}

impl Filter for MinimumRatingFilter {
    fn name(&self) -> &str {
        "MinimumRatingFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        _context: &RankingContext,
    ) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| {
                self.catalog
                    .get(candidate.row)
                    .is_some_and(|movie| movie.rating > self.min_rating)
            })
            .collect();

        Ok(filtered)
    }
}
