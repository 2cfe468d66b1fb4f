//! Catalog building and validation.
//!
//! Turns a batch of records from the repository into a [`Catalog`]:
//! - validate every record up front (typed fields, no surprises later)
//! - build the id -> row index
//! - refuse duplicate ids and empty catalogs

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::collections::HashMap;
use tracing::info;

impl Catalog {
    /// Build a catalog snapshot, keeping the records' order as row order.
    ///
    /// Fails on the first invalid record so a bad store never yields a
    /// half-usable engine.
    pub fn from_records(movies: Vec<MovieRecord>) -> Result<Self> {
        if movies.is_empty() {
            return Err(DataLoadError::EmptyCatalog);
        }

        let mut rows_by_id = HashMap::with_capacity(movies.len());
        for (row, movie) in movies.iter().enumerate() {
            validate_record(movie)?;
            if rows_by_id.insert(movie.id, row).is_some() {
                return Err(DataLoadError::DuplicateMovie(movie.id));
            }
        }

        info!("Catalog built with {} movies", movies.len());
        Ok(Self { movies, rows_by_id })
    }
}

fn validate_record(movie: &MovieRecord) -> Result<()> {
    if movie.title.trim().is_empty() {
        return Err(DataLoadError::InvalidValue {
            id: movie.id,
            field: "title".to_string(),
            value: movie.title.clone(),
        });
    }
    if !movie.rating.is_finite() || movie.rating < 0.0 {
        return Err(DataLoadError::InvalidValue {
            id: movie.id,
            field: "rating".to_string(),
            value: movie.rating.to_string(),
        });
    }
    Ok(())
}
