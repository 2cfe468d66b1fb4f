//! # Data Loader Crate
//!
//! Loads the movie catalog and user engagement history the recommendation
//! engine reads from.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieRecord, EngagedMovie, Catalog)
//! - **parser**: Parse `.dat` and JSON files into typed records
//! - **index**: Validate records and build the row-indexed [`Catalog`]
//! - **repository**: The [`CatalogRepository`] trait and its file/in-memory stores
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{Catalog, CatalogRepository, FileRepository};
//!
//! let repo = FileRepository::open("data/sample")?;
//! let catalog = Catalog::from_records(repo.fetch_all_movies()?)?;
//!
//! let row = catalog.row_of(1).unwrap();
//! println!("{} is row {}", catalog.get(row).unwrap().title, row);
//! ```

// Public modules
pub mod error;
pub mod index;
pub mod parser;
pub mod repository;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use repository::{CatalogRepository, FileRepository, InMemoryRepository};
pub use types::{
    // Type aliases
    MovieId,
    UserId,
    // Core types
    Catalog,
    EngagedMovie,
    MovieRecord,
    SIGNIFICANT_GENRES,
    split_genres,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: MovieId, genres: &str) -> MovieRecord {
        MovieRecord {
            id,
            title: format!("Movie {id}"),
            genres: split_genres(genres),
            keywords: "kw".to_string(),
            overview: "ov".to_string(),
            rating: 7.0,
            vote_count: 1000,
        }
    }

    #[test]
    fn test_significant_genres_caps_at_three() {
        let movie = record(1, "Action|Adventure|Drama|Thriller|War");
        assert_eq!(movie.significant_genres().len(), SIGNIFICANT_GENRES);
        assert_eq!(movie.significant_genres()[2], "Drama");
    }

    #[test]
    fn test_significant_genres_keeps_duplicates() {
        let movie = record(1, "Drama|Drama");
        assert_eq!(movie.significant_genres(), ["Drama", "Drama"]);
    }

    #[test]
    fn test_split_genres_keeps_segment_positions() {
        assert!(split_genres("").is_empty());
        assert_eq!(split_genres("Action||Drama"), vec!["Action", "", "Drama"]);

        // An empty slot still occupies one of the leading three
        let movie = record(1, "Action||Drama|Comedy");
        assert_eq!(movie.significant_genres(), ["Action", "", "Drama"]);
    }

    #[test]
    fn test_repository_to_catalog() {
        let repo = InMemoryRepository::new(vec![record(5, "Comedy"), record(7, "Drama")]);
        let catalog = Catalog::from_records(repo.fetch_all_movies().unwrap()).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get_movie(7).unwrap().genres, vec!["Drama"]);
    }
}
