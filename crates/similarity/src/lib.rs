//! # Similarity Crate
//!
//! The similarity engine behind both recommendation strategies.
//!
//! ## Profile mode
//! [`ProfileSimilarity`] scores every catalog movie against each movie a
//! user engaged with, averaging genre, keyword and overview cosine
//! similarity into a [`SimilarityScoreMatrix`].
//!
//! ## Neighbor mode
//! [`NeighborSearch`] resolves one reference movie and asks the
//! [`NeighborIndex`] for its K nearest movies in the combined space.
//!
//! Both are pure functions of the frozen catalog and vector spaces, so they
//! can serve any number of concurrent requests without locking.
//!
//! ## Example Usage
//!
//! ```ignore
//! use similarity::{NeighborIndex, NeighborQuery, NeighborSearch, ProfileSimilarity};
//! use std::sync::Arc;
//!
//! let features = features::Features::extract(&catalog);
//! let profile = ProfileSimilarity::new(catalog.clone(), Arc::new(features.profile));
//! let matrix = profile.score(&[1, 2, 3])?;
//!
//! let index = Arc::new(NeighborIndex::build(features.combined));
//! let search = NeighborSearch::new(catalog.clone(), index);
//! let neighbors = search.search(&NeighborQuery::Id(1))?;
//! ```

pub mod error;
pub mod neighbors;
pub mod profile;

pub use error::{Result, SimilarityError};
pub use neighbors::{DEFAULT_NEIGHBORS, Neighbor, NeighborIndex, NeighborQuery, NeighborSearch};
pub use profile::{ProfileSimilarity, QueryRow, SimilarityScoreMatrix, resolve_query_rows};

#[cfg(test)]
pub(crate) mod test_support {
    use data_loader::{Catalog, MovieId, MovieRecord, split_genres};

    pub fn movie(
        id: MovieId,
        title: &str,
        genres: &str,
        keywords: &str,
        overview: &str,
        rating: f32,
        vote_count: u32,
    ) -> MovieRecord {
        MovieRecord {
            id,
            title: title.to_string(),
            genres: split_genres(genres),
            keywords: keywords.to_string(),
            overview: overview.to_string(),
            rating,
            vote_count,
        }
    }

    /// Three movies: A and B share genre, keyword and overview terms; C shares nothing.
    pub fn sample_catalog() -> Catalog {
        Catalog::from_records(vec![
            movie(1, "A", "Action|Drama", "hero war", "a soldier returns", 7.0, 2000),
            movie(2, "B", "Action", "hero battle", "a soldier fights", 6.0, 1500),
            movie(3, "C", "Comedy", "laugh", "a clown performs", 8.0, 3000),
        ])
        .unwrap()
    }
}
