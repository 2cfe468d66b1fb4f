//! Business rules for profile ranking.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which engaged movies are excluded from a query row's candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionPolicy {
    /// Only the movie the query row was built from. A movie engaged at a
    /// different profile position can still come back.
    #[default]
    QueryRow,
    /// Every movie anywhere in the user's profile
    Profile,
}

impl FromStr for ExclusionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "query_row" | "query-row" => Ok(ExclusionPolicy::QueryRow),
            "profile" => Ok(ExclusionPolicy::Profile),
            other => Err(format!(
                "unknown exclusion policy '{}' (expected query_row or profile)",
                other
            )),
        }
    }
}

impl fmt::Display for ExclusionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionPolicy::QueryRow => f.write_str("query_row"),
            ExclusionPolicy::Profile => f.write_str("profile"),
        }
    }
}

/// Thresholds and caps applied by the profile ranker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingConfig {
    /// Candidates need a rating strictly above this
    pub min_rating: f32,
    /// Candidates need strictly more votes than this
    pub min_vote_count: u32,
    /// Maximum number of recommendations
    pub top_n: usize,
    pub exclusion: ExclusionPolicy,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            min_rating: 5.0,
            min_vote_count: 1000,
            top_n: 10,
            exclusion: ExclusionPolicy::QueryRow,
        }
    }
}

impl RankingConfig {
    /// Configure minimum rating (default: 5.0)
    pub fn with_min_rating(mut self, rating: f32) -> Self {
        self.min_rating = rating;
        self
    }

    /// Configure vote-count threshold (default: 1000)
    pub fn with_min_vote_count(mut self, count: u32) -> Self {
        self.min_vote_count = count;
        self
    }

    /// Configure result cap (default: 10)
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_exclusion(mut self, exclusion: ExclusionPolicy) -> Self {
        self.exclusion = exclusion;
        self
    }
}
