//! Neighbor mode: the K catalog movies closest to one reference movie.
//!
//! [`NeighborIndex`] keeps an inverted index (term -> rows) over the combined
//! vector space. A query only scores rows sharing at least one term with it;
//! every other row is at cosine distance 1 and is only used to pad the result
//! up to K.

use crate::error::{Result, SimilarityError};
use data_loader::{Catalog, MovieId};
use features::{SparseVector, VectorSpace, cosine_distance};
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Neighbors returned per query, the query movie itself included.
pub const DEFAULT_NEIGHBORS: usize = 6;

/// Below this many candidate rows, scoring stays on the calling thread.
const PARALLEL_THRESHOLD: usize = 1024;

/// One neighbor: catalog row and cosine distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub distance: f32,
}

impl Neighbor {
    pub fn similarity(&self) -> f32 {
        1.0 - self.distance
    }
}

/// How the reference movie of a neighbor query is identified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NeighborQuery {
    Id(MovieId),
    /// Case-insensitive; the first matching title in catalog order wins
    Title(String),
}

impl fmt::Display for NeighborQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NeighborQuery::Id(id) => write!(f, "id {}", id),
            NeighborQuery::Title(title) => write!(f, "title '{}'", title),
        }
    }
}

/// Nearest-neighbor index over the combined vector space, cosine distance.
#[derive(Debug, Clone)]
pub struct NeighborIndex {
    space: VectorSpace,
    /// Rows holding each vocabulary term, ascending
    postings: Vec<Vec<u32>>,
}

impl NeighborIndex {
    /// Index every row of the space. Takes ownership: the index is the
    /// space's only consumer.
    pub fn build(space: VectorSpace) -> Self {
        let mut postings: Vec<Vec<u32>> = vec![Vec::new(); space.vocabulary_size()];
        for (row, vector) in space.rows().iter().enumerate() {
            for (term, _) in vector.iter() {
                postings[term as usize].push(row as u32);
            }
        }
        Self { space, postings }
    }

    pub fn len(&self) -> usize {
        self.space.len()
    }

    pub fn is_empty(&self) -> bool {
        self.space.is_empty()
    }

    pub fn space(&self) -> &VectorSpace {
        &self.space
    }

    /// K nearest rows to an indexed row. `None` if the row is out of range.
    pub fn k_nearest(&self, row: usize, k: usize) -> Option<Vec<Neighbor>> {
        self.space.row(row).map(|query| self.nearest_to(query, k))
    }

    /// K nearest rows to an arbitrary vector, nearest first.
    ///
    /// Ties are broken by ascending row, so results are deterministic.
    pub fn nearest_to(&self, query: &SparseVector, k: usize) -> Vec<Neighbor> {
        let k = k.min(self.len());
        if k == 0 {
            return Vec::new();
        }

        let mut is_candidate = vec![false; self.len()];
        let mut candidates: Vec<usize> = Vec::new();
        for (term, _) in query.iter() {
            if let Some(rows) = self.postings.get(term as usize) {
                for &row in rows {
                    let row = row as usize;
                    if !is_candidate[row] {
                        is_candidate[row] = true;
                        candidates.push(row);
                    }
                }
            }
        }

        let rows = self.space.rows();
        let score = |row: usize| Neighbor {
            row,
            distance: cosine_distance(query, &rows[row]),
        };
        let mut neighbors: Vec<Neighbor> = if candidates.len() >= PARALLEL_THRESHOLD {
            candidates.par_iter().map(|&row| score(row)).collect()
        } else {
            candidates.iter().map(|&row| score(row)).collect()
        };

        // Rows sharing no term sit at distance 1; the first k of them are
        // enough to complete any result.
        neighbors.extend(
            (0..self.len())
                .filter(|&row| !is_candidate[row])
                .take(k)
                .map(|row| Neighbor { row, distance: 1.0 }),
        );

        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.row.cmp(&b.row)));
        neighbors.truncate(k);
        neighbors
    }
}

/// Resolves neighbor queries against a catalog and answers them from the index.
#[derive(Debug, Clone)]
pub struct NeighborSearch {
    catalog: Arc<Catalog>,
    index: Arc<NeighborIndex>,
    neighbors: usize,
}

impl NeighborSearch {
    pub fn new(catalog: Arc<Catalog>, index: Arc<NeighborIndex>) -> Self {
        debug_assert_eq!(catalog.len(), index.len());
        Self {
            catalog,
            index,
            neighbors: DEFAULT_NEIGHBORS,
        }
    }

    /// Configure how many neighbors a query returns (default: 6)
    pub fn with_neighbors(mut self, neighbors: usize) -> Self {
        self.neighbors = neighbors;
        self
    }

    pub fn neighbors(&self) -> usize {
        self.neighbors
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Catalog row of the query's reference movie
    pub fn resolve(&self, query: &NeighborQuery) -> Result<usize> {
        let row = match query {
            NeighborQuery::Id(id) => self.catalog.row_of(*id),
            NeighborQuery::Title(title) => self.catalog.find_by_title(title),
        };
        row.ok_or_else(|| SimilarityError::NotFound {
            query: query.to_string(),
        })
    }

    /// Nearest neighbors of the reference movie, nearest first.
    ///
    /// The reference movie is normally its own first neighbor at distance 0.
    #[instrument(skip(self), fields(k = self.neighbors))]
    pub fn search(&self, query: &NeighborQuery) -> Result<Vec<Neighbor>> {
        let row = self.resolve(query)?;
        let neighbors = self
            .index
            .k_nearest(row, self.neighbors)
            .ok_or_else(|| SimilarityError::NotFound {
                query: query.to_string(),
            })?;
        debug!("Found {} neighbors for row {}", neighbors.len(), row);
        Ok(neighbors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{movie, sample_catalog};
    use features::Field;

    fn search() -> NeighborSearch {
        let catalog = Arc::new(sample_catalog());
        let index = Arc::new(NeighborIndex::build(VectorSpace::fit(Field::Combined, &catalog)));
        NeighborSearch::new(catalog, index)
    }

    #[test]
    fn test_index_covers_catalog() {
        let search = search();
        assert_eq!(search.index.len(), search.catalog.len());
    }

    #[test]
    fn test_two_nearest_are_self_then_closest() {
        let neighbors = search()
            .with_neighbors(2)
            .search(&NeighborQuery::Title("a".to_string()))
            .unwrap();

        assert_eq!(neighbors.len(), 2);
        assert_eq!(neighbors[0].row, 0);
        assert_eq!(neighbors[0].similarity(), 1.0);
        assert_eq!(neighbors[1].row, 1);
    }

    #[test]
    fn test_k_is_capped_by_catalog_size() {
        let neighbors = search().search(&NeighborQuery::Id(3)).unwrap();
        assert_eq!(neighbors.len(), 3);
        assert_eq!(neighbors[0].row, 2);
    }

    #[test]
    fn test_distances_non_decreasing() {
        let neighbors = search().search(&NeighborQuery::Id(2)).unwrap();
        assert!(neighbors.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_non_overlapping_rows_pad_in_catalog_order() {
        // "C" shares no term with A or B
        let neighbors = search().search(&NeighborQuery::Id(3)).unwrap();
        assert_eq!(neighbors[1], Neighbor { row: 0, distance: 1.0 });
        assert_eq!(neighbors[2], Neighbor { row: 1, distance: 1.0 });
    }

    #[test]
    fn test_unknown_id_not_found() {
        let err = search().search(&NeighborQuery::Id(77)).unwrap_err();
        assert_eq!(
            err,
            SimilarityError::NotFound {
                query: "id 77".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_title_not_found() {
        let err = search()
            .search(&NeighborQuery::Title("Nope".to_string()))
            .unwrap_err();
        assert!(matches!(err, SimilarityError::NotFound { .. }));
    }

    #[test]
    fn test_zero_vector_query_pads_with_catalog_order() {
        let catalog = Arc::new(
            Catalog::from_records(vec![
                movie(1, "Blank", "", "", "", 7.0, 2000),
                movie(2, "Other", "Action", "hero", "soldier", 7.0, 2000),
            ])
            .unwrap(),
        );
        let index = NeighborIndex::build(VectorSpace::fit(Field::Combined, &catalog));
        let neighbors = index.k_nearest(0, 2).unwrap();

        assert_eq!(
            neighbors,
            vec![
                Neighbor { row: 0, distance: 1.0 },
                Neighbor { row: 1, distance: 1.0 }
            ]
        );
    }

    #[test]
    fn test_out_of_range_row() {
        let search = search();
        assert!(search.index.k_nearest(10, 2).is_none());
        assert!(search.index.k_nearest(0, 0).unwrap().is_empty());
    }

    #[test]
    fn test_matches_full_scan() {
        let search = search();
        let index = &search.index;
        for row in 0..index.len() {
            let query = index.space().row(row).unwrap();
            let mut expected: Vec<Neighbor> = index
                .space()
                .rows()
                .iter()
                .enumerate()
                .map(|(r, v)| Neighbor {
                    row: r,
                    distance: cosine_distance(query, v),
                })
                .collect();
            expected.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.row.cmp(&b.row)));

            assert_eq!(index.nearest_to(query, 3), expected);
        }
    }
}
