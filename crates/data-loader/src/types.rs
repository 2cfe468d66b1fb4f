//! Core domain types for the movie catalog.
//!
//! The catalog is loaded once and never mutated afterwards. Row order in
//! [`Catalog`] is the order every vector space is built in, so anything that
//! indexes by row must go through the same snapshot.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a movie
pub type MovieId = u32;

/// Identifier of a user in the backing store (opaque string key)
pub type UserId = String;

/// Only the leading genres of a movie take part in feature extraction.
pub const SIGNIFICANT_GENRES: usize = 3;

// =============================================================================
// Movie Records
// =============================================================================

/// A single catalog entry with the text fields the engine vectorizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    /// Genres in catalog order, e.g. `["Action", "Drama"]`
    pub genres: Vec<String>,
    /// Free-form keyword text
    pub keywords: String,
    /// Free-form plot overview
    pub overview: String,
    /// Average audience rating (0-10 scale)
    pub rating: f32,
    pub vote_count: u32,
}

impl MovieRecord {
    /// The genres that count for similarity: at most the first three,
    /// original order, duplicates kept.
    pub fn significant_genres(&self) -> &[String] {
        let end = self.genres.len().min(SIGNIFICANT_GENRES);
        &self.genres[..end]
    }
}

/// Split a pipe-delimited genre string into its parts.
///
/// Segments keep their position: `"Action||Drama"` yields three entries,
/// the middle one empty, so it still counts toward the leading genres.
/// A blank string yields no genres.
pub fn split_genres(s: &str) -> Vec<String> {
    if s.trim().is_empty() {
        return Vec::new();
    }
    s.split('|').map(|g| g.trim().to_string()).collect()
}

// =============================================================================
// User Profile
// =============================================================================

/// One entry of a user's engagement history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngagedMovie {
    pub movie_id: MovieId,
    /// The user's own score, when the store recorded one
    pub rating: Option<f32>,
}

impl EngagedMovie {
    pub fn new(movie_id: MovieId) -> Self {
        Self {
            movie_id,
            rating: None,
        }
    }
}

// =============================================================================
// Catalog - the immutable snapshot
// =============================================================================

/// Validated, row-indexed snapshot of every movie record.
///
/// Build it with [`Catalog::from_records`]; there is no way to add or remove
/// rows afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub(crate) movies: Vec<MovieRecord>,
    pub(crate) rows_by_id: HashMap<MovieId, usize>,
}

impl Catalog {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Record at a given row
    pub fn get(&self, row: usize) -> Option<&MovieRecord> {
        self.movies.get(row)
    }

    /// Record with a given identifier
    pub fn get_movie(&self, id: MovieId) -> Option<&MovieRecord> {
        self.row_of(id).map(|row| &self.movies[row])
    }

    /// Row index of a movie identifier
    pub fn row_of(&self, id: MovieId) -> Option<usize> {
        self.rows_by_id.get(&id).copied()
    }

    /// First row whose title matches case-insensitively.
    pub fn find_by_title(&self, title: &str) -> Option<usize> {
        let wanted = title.to_lowercase();
        self.movies
            .iter()
            .position(|movie| movie.title.to_lowercase() == wanted)
    }

    /// All records in row order
    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovieRecord> {
        self.movies.iter()
    }
}
