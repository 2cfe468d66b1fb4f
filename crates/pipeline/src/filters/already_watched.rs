//! Filter to remove movies the user has already engaged with.
//!
//! What counts as "already engaged" depends on the [`ExclusionPolicy`].

use crate::config::ExclusionPolicy;
use crate::traits::Filter;
use crate::types::{Candidate, RankingContext};
use anyhow::Result;

/// Removes candidates the user has already seen.
///
/// ## Algorithm
/// - `QueryRow`: drop the candidate equal to `context.query_movie`
/// - `Profile`: drop every candidate in `context.profile` (O(1) HashSet lookups)
pub struct AlreadyWatchedFilter {
    policy: ExclusionPolicy,
}

impl AlreadyWatchedFilter {
    pub fn new(policy: ExclusionPolicy) -> Self {
        Self { policy }
    }
}

impl Default for AlreadyWatchedFilter {
    fn default() -> Self {
        Self::new(ExclusionPolicy::default())
    }
}

impl Filter for AlreadyWatchedFilter {
    fn name(&self) -> &str {
        "AlreadyWatchedFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &RankingContext,
    ) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = match self.policy {
            ExclusionPolicy::QueryRow => candidates
                .into_iter()
                .filter(|candidate| Some(candidate.movie_id) != context.query_movie)
                .collect(),
            ExclusionPolicy::Profile => candidates
                .into_iter()
                .filter(|candidate| !context.profile.contains(&candidate.movie_id))
                .collect(),
        };
        Ok(filtered)
    }
}
