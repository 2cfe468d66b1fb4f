//! Error types for similarity queries.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimilarityError {
    /// None of the user's engaged movies exist in the catalog snapshot
    #[error("No matching movie IDs found in the movie data ({requested} engaged movies checked)")]
    NoMatch { requested: usize },

    /// A neighbor query did not resolve to any catalog row
    #[error("Movie not found in the database: {query}")]
    NotFound { query: String },
}

pub type Result<T> = std::result::Result<T, SimilarityError>;
