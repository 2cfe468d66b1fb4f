//! Filter implementations for the ranking pipeline.
//!
//! This module contains the concrete filters that can be composed into a
//! FilterPipeline.

pub mod already_watched;
pub mod minimum_rating;
pub mod minimum_votes;

// Re-export for convenience
pub use already_watched::AlreadyWatchedFilter;
pub use minimum_rating::MinimumRatingFilter;
pub use minimum_votes::MinimumVotesFilter;
