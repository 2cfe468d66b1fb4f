//! Profile mode: score every catalog movie against each movie a user engaged with.
//!
//! ## Algorithm
//! 1. Resolve the engaged ids to catalog rows, in profile order
//! 2. For every (query row, catalog row) pair, average the cosine
//!    similarities of the genre, keyword and overview spaces
//! 3. Return the dense |query rows| x |catalog| matrix
//!
//! The matrix is built per request and never cached.

use crate::error::{Result, SimilarityError};
use data_loader::{Catalog, MovieId};
use features::{ProfileSpaces, cosine_similarity};
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

/// One query row: an engaged movie and where it sits in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryRow {
    /// The engaged id this row was built from
    pub movie_id: MovieId,
    /// Catalog row of that movie
    pub row: usize,
}

/// Map engaged ids to catalog rows.
///
/// Profile order is kept. Ids missing from the snapshot are skipped and a
/// repeated id keeps only its first position.
pub fn resolve_query_rows(catalog: &Catalog, engaged: &[MovieId]) -> Result<Vec<QueryRow>> {
    let mut seen = HashSet::with_capacity(engaged.len());
    let mut query_rows = Vec::with_capacity(engaged.len());

    for &movie_id in engaged {
        if !seen.insert(movie_id) {
            continue;
        }
        match catalog.row_of(movie_id) {
            Some(row) => query_rows.push(QueryRow { movie_id, row }),
            None => debug!("Engaged movie {} is not in the catalog", movie_id),
        }
    }

    if query_rows.is_empty() {
        return Err(SimilarityError::NoMatch {
            requested: engaged.len(),
        });
    }
    Ok(query_rows)
}

/// Dense similarity scores: one row per query movie, one column per catalog movie.
#[derive(Debug, Clone)]
pub struct SimilarityScoreMatrix {
    query_rows: Vec<QueryRow>,
    columns: usize,
    scores: Vec<f32>,
}

impl SimilarityScoreMatrix {
    pub fn query_rows(&self) -> &[QueryRow] {
        &self.query_rows
    }

    /// Number of query rows
    pub fn rows(&self) -> usize {
        self.query_rows.len()
    }

    /// Number of catalog columns
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Scores of query row `i` against every catalog movie
    pub fn row(&self, i: usize) -> &[f32] {
        &self.scores[i * self.columns..(i + 1) * self.columns]
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        if i < self.rows() && j < self.columns {
            Some(self.scores[i * self.columns + j])
        } else {
            None
        }
    }

    /// (query row, scores) pairs in query order
    pub fn iter(&self) -> impl Iterator<Item = (&QueryRow, &[f32])> {
        self.query_rows.iter().zip(self.scores.chunks(self.columns.max(1)))
    }
}

/// Profile-mode similarity over a frozen catalog and its per-field spaces.
///
/// Cheap to clone: both fixtures sit behind `Arc`.
#[derive(Debug, Clone)]
pub struct ProfileSimilarity {
    catalog: Arc<Catalog>,
    spaces: Arc<ProfileSpaces>,
}

impl ProfileSimilarity {
    pub fn new(catalog: Arc<Catalog>, spaces: Arc<ProfileSpaces>) -> Self {
        debug_assert_eq!(catalog.len(), spaces.len());
        Self { catalog, spaces }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Mean of the three per-field cosine similarities between two catalog rows
    pub fn pair_score(&self, a: usize, b: usize) -> f32 {
        let total: f32 = self
            .spaces
            .spaces()
            .iter()
            .map(|space| match (space.row(a), space.row(b)) {
                (Some(x), Some(y)) => cosine_similarity(x, y),
                _ => 0.0,
            })
            .sum();
        total / 3.0
    }

    /// Build the score matrix for a user's engaged movies.
    ///
    /// Fails with [`SimilarityError::NoMatch`] when none of the ids resolve.
    #[instrument(skip(self, engaged), fields(engaged = engaged.len()))]
    pub fn score(&self, engaged: &[MovieId]) -> Result<SimilarityScoreMatrix> {
        let query_rows = resolve_query_rows(&self.catalog, engaged)?;
        let columns = self.catalog.len();

        let mut scores = Vec::with_capacity(query_rows.len() * columns);
        for query in &query_rows {
            let row: Vec<f32> = (0..columns)
                .into_par_iter()
                .map(|column| self.pair_score(query.row, column))
                .collect();
            scores.extend(row);
        }

        debug!(
            "Scored {} query movies against {} catalog movies",
            query_rows.len(),
            columns
        );

        Ok(SimilarityScoreMatrix {
            query_rows,
            columns,
            scores,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_catalog;
    use features::VectorSpace;

    fn profile() -> ProfileSimilarity {
        let catalog = Arc::new(sample_catalog());
        let spaces = Arc::new(ProfileSpaces::fit(&catalog));
        ProfileSimilarity::new(catalog, spaces)
    }

    #[test]
    fn test_matrix_shape() {
        let profile = profile();
        let matrix = profile.score(&[1, 3]).unwrap();

        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.columns(), 3);
        assert_eq!(matrix.row(1).len(), 3);
        assert!(matrix.get(2, 0).is_none());
    }

    #[test]
    fn test_self_score_is_one() {
        let matrix = profile().score(&[1]).unwrap();
        assert_eq!(matrix.get(0, 0), Some(1.0));
    }

    #[test]
    fn test_more_overlap_scores_higher() {
        let matrix = profile().score(&[1]).unwrap();
        let b = matrix.get(0, 1).unwrap();
        let c = matrix.get(0, 2).unwrap();

        assert!(b > c);
        assert_eq!(c, 0.0);
    }

    #[test]
    fn test_score_is_mean_of_fields() {
        let profile = profile();
        let spaces = &profile.spaces;
        let pair = |space: &VectorSpace| {
            cosine_similarity(space.row(0).unwrap(), space.row(1).unwrap())
        };
        let expected =
            (pair(&spaces.genres) + pair(&spaces.keywords) + pair(&spaces.overview)) / 3.0;

        assert!((profile.pair_score(0, 1) - expected).abs() < 1e-6);
        assert_eq!(profile.pair_score(0, 1), profile.pair_score(1, 0));
    }

    #[test]
    fn test_query_rows_follow_profile_order() {
        let catalog = sample_catalog();
        let rows = resolve_query_rows(&catalog, &[3, 42, 1, 3]).unwrap();

        assert_eq!(
            rows,
            vec![
                QueryRow { movie_id: 3, row: 2 },
                QueryRow { movie_id: 1, row: 0 },
            ]
        );
    }

    #[test]
    fn test_no_match() {
        let result = profile().score(&[40, 41]);
        assert_eq!(result.unwrap_err(), SimilarityError::NoMatch { requested: 2 });
    }

    #[test]
    fn test_empty_profile_is_no_match() {
        assert!(matches!(
            profile().score(&[]),
            Err(SimilarityError::NoMatch { requested: 0 })
        ));
    }

    #[test]
    fn test_iter_pairs_rows_with_scores() {
        let matrix = profile().score(&[2, 1]).unwrap();
        let ids: Vec<MovieId> = matrix.iter().map(|(q, _)| q.movie_id).collect();
        assert_eq!(ids, vec![2, 1]);
        for (query, scores) in matrix.iter() {
            assert_eq!(scores[query.row], 1.0);
        }
    }
}
