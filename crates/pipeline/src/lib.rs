//! Ranking of similarity scores into recommendation lists.
//!
//! This crate provides:
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//! - ProfileRanker for profile-mode scores, `rank_neighbors` for neighbor mode
//!
//! ## Architecture
//! Profile-mode ranking processes one query row at a time:
//! 1. Candidates are sorted by descending similarity
//! 2. Filters remove unwanted candidates (already engaged, low quality)
//! 3. Survivors are appended until the result cap is hit
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{ProfileRanker, RankingConfig, RankingContext};
//!
//! let scores = profile_similarity.score(&engaged)?;
//! let context = RankingContext::new(user_id).with_profile(engaged.iter().copied());
//!
//! let ranker = ProfileRanker::new(catalog.clone(), &RankingConfig::default());
//! let items = ranker.rank(&scores, &context)?;
//! ```

pub mod config;
pub mod filter_pipeline;
pub mod filters;
pub mod ranker;
pub mod traits;
pub mod types;

// Re-export main types
pub use config::{ExclusionPolicy, RankingConfig};
pub use filter_pipeline::FilterPipeline;
pub use ranker::{ProfileRanker, rank_neighbors};
pub use traits::Filter;
pub use types::{Candidate, RankingContext, RecommendationItem};
