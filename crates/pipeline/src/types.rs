//! Candidates flowing through the ranker and the items it emits.

use data_loader::{MovieId, UserId};
use serde::Serialize;
use std::collections::HashSet;

/// A catalog movie scored against one query movie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub row: usize,
    pub movie_id: MovieId,
    pub similarity: f32,
}

impl Candidate {
    pub fn new(row: usize, movie_id: MovieId, similarity: f32) -> Self {
        Self {
            row,
            movie_id,
            similarity,
        }
    }
}

/// What filters may know about the request.
#[derive(Debug, Clone)]
pub struct RankingContext {
    pub user_id: UserId,
    /// Every movie in the user's profile
    pub profile: HashSet<MovieId>,
    /// The engaged movie the current candidates were scored against
    pub query_movie: Option<MovieId>,
}

impl RankingContext {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            profile: HashSet::new(),
            query_movie: None,
        }
    }

    pub fn with_profile(mut self, profile: impl IntoIterator<Item = MovieId>) -> Self {
        self.profile = profile.into_iter().collect();
        self
    }

    /// The same context, scoped to one query row
    pub fn for_query(&self, movie_id: MovieId) -> Self {
        Self {
            query_movie: Some(movie_id),
            ..self.clone()
        }
    }
}

/// One recommendation as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationItem {
    pub movie_id: MovieId,
    pub title: String,
    pub similarity: f32,
}
