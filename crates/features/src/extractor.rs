//! Feature extraction over a whole catalog snapshot.
//!
//! Two independent pipelines are built from the same snapshot:
//! - profile spaces: genres, keywords and overview, each with its own vocabulary
//! - the combined space used for nearest-neighbor lookup
//!
//! Nothing is shared between them. All four fits run in parallel.

use crate::space::{Field, VectorSpace};
use data_loader::Catalog;
use std::time::Instant;
use tracing::{info, instrument};

/// The three per-field spaces used for profile similarity.
#[derive(Debug, Clone)]
pub struct ProfileSpaces {
    pub genres: VectorSpace,
    pub keywords: VectorSpace,
    pub overview: VectorSpace,
}

impl ProfileSpaces {
    pub fn fit(catalog: &Catalog) -> Self {
        let (genres, (keywords, overview)) = rayon::join(
            || VectorSpace::fit(Field::Genres, catalog),
            || {
                rayon::join(
                    || VectorSpace::fit(Field::Keywords, catalog),
                    || VectorSpace::fit(Field::Overview, catalog),
                )
            },
        );
        Self {
            genres,
            keywords,
            overview,
        }
    }

    /// Rows in each space; all three are equal by construction
    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    pub fn spaces(&self) -> [&VectorSpace; 3] {
        [&self.genres, &self.keywords, &self.overview]
    }
}

/// Every vector space derived from one catalog snapshot.
#[derive(Debug, Clone)]
pub struct Features {
    pub profile: ProfileSpaces,
    pub combined: VectorSpace,
}

impl Features {
    /// Build all vector spaces for the catalog.
    #[instrument(skip(catalog), fields(movies = catalog.len()))]
    pub fn extract(catalog: &Catalog) -> Self {
        let start = Instant::now();

        let (profile, combined) = rayon::join(
            || ProfileSpaces::fit(catalog),
            || VectorSpace::fit(Field::Combined, catalog),
        );

        info!(
            "Extracted features in {:.2?} (vocab sizes {}/{}/{}, combined {})",
            start.elapsed(),
            profile.genres.vocabulary_size(),
            profile.keywords.vocabulary_size(),
            profile.overview.vocabulary_size(),
            combined.vocabulary_size()
        );

        Self { profile, combined }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{MovieRecord, split_genres};

    fn movie(id: u32, genres: &str, keywords: &str, overview: &str) -> MovieRecord {
        MovieRecord {
            id,
            title: format!("M{id}"),
            genres: split_genres(genres),
            keywords: keywords.to_string(),
            overview: overview.to_string(),
            rating: 7.0,
            vote_count: 2000,
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_records(vec![
            movie(1, "Action|Drama", "hero war", "a soldier returns"),
            movie(2, "Action", "hero battle", "a soldier fights"),
            movie(3, "Comedy", "laugh", "a clown performs"),
            movie(4, "", "", ""),
        ])
        .unwrap()
    }

    #[test]
    fn test_every_space_has_one_row_per_movie() {
        let catalog = catalog();
        let features = Features::extract(&catalog);

        for space in features.profile.spaces() {
            assert_eq!(space.len(), catalog.len());
        }
        assert_eq!(features.combined.len(), catalog.len());
        assert_eq!(features.profile.len(), catalog.len());
    }

    #[test]
    fn test_vocabularies_are_independent() {
        let features = Features::extract(&catalog());

        // genres: action, comedy, drama
        assert_eq!(features.profile.genres.vocabulary_size(), 3);
        // keywords: battle, hero, laugh, war
        assert_eq!(features.profile.keywords.vocabulary_size(), 4);
        // combined holds every term from all three channels
        assert!(features.combined.vocabulary_size() > features.profile.overview.vocabulary_size());
    }

    #[test]
    fn test_empty_movie_keeps_zero_rows() {
        let features = Features::extract(&catalog());
        for space in features.profile.spaces() {
            assert!(space.row(3).unwrap().is_zero());
        }
        assert!(features.combined.row(3).unwrap().is_zero());
    }
}
