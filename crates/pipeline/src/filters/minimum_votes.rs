//! Filter to keep only established titles.
//!
//! A high rating from a handful of voters says little, so candidates also
//! need a minimum number of votes.

use crate::traits::Filter;
use crate::types::{Candidate, RankingContext};
use anyhow::Result;
use data_loader::Catalog;
use std::sync::Arc;

/// Removes candidates with `vote_count <= min_votes`.
pub struct MinimumVotesFilter {
    catalog: Arc<Catalog>,
    min_votes: u32,
}

impl MinimumVotesFilter {
    /// # Arguments
    /// * `catalog` - Shared catalog snapshot for record lookups
    /// * `min_votes` - Vote count a movie must exceed (typically 1000)
    pub fn new(catalog: Arc<Catalog>, min_votes: u32) -> Self {
        Self { catalog, min_votes }
    }
}

impl Filter for MinimumVotesFilter {
    fn name(&self) -> &str {
        "MinimumVotesFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        _context: &RankingContext,
    ) -> Result<Vec<Candidate>> {
        Ok(candidates
            .into_iter()
            .filter(|candidate| {
                self.catalog
                    .get(candidate.row)
                    .is_some_and(|movie| movie.vote_count > self.min_votes)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::MovieRecord;

    fn movie(id: u32, vote_count: u32) -> MovieRecord {
        MovieRecord {
            id,
            title: format!("Movie {id}"),
            genres: vec![],
            keywords: String::new(),
            overview: String::new(),
            rating: 8.0,
            vote_count,
        }
    }

    #[test]
    fn test_minimum_votes_filter() {
        let catalog = Arc::new(
            Catalog::from_records(vec![movie(1, 2500), movie(2, 200), movie(3, 1000)]).unwrap(),
        );
        let candidates = vec![
            Candidate::new(0, 1, 0.3),
            Candidate::new(1, 2, 0.2),
            Candidate::new(2, 3, 0.1),
        ];

        let filter = MinimumVotesFilter::new(catalog, 1000);
        let filtered = filter.apply(candidates, &RankingContext::new("u1")).unwrap();

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].movie_id, 1);
    }
}
