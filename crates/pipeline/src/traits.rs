//! Core traits for the ranking pipeline.
//!
//! This module defines the Filter trait that allows composable business
//! rules to be applied to scored candidates.

use crate::types::{Candidate, RankingContext};
use anyhow::Result;

/// Core trait for filtering candidates.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared by concurrent requests
/// - Filters take ownership of the Vec<Candidate> and return a filtered Vec
/// - Filters must keep the relative order of the candidates they keep;
///   the ranker relies on it
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter (takes ownership)
    /// * `context` - The request's profile and current query movie
    fn apply(&self, candidates: Vec<Candidate>, context: &RankingContext)
    -> Result<Vec<Candidate>>;
}
