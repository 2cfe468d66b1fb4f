//! Error types for the data-loader crate.
//!
//! Every failure here is a load-time failure: the catalog either comes up
//! whole and validated, or not at all.

use crate::types::MovieId;
use thiserror::Error;

/// Errors that can occur while loading, parsing or validating the catalog
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in a `.dat` file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// JSON catalog was malformed or a record was missing a required field
    #[error("Invalid JSON in {file}: {source}")]
    JsonError {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field} of movie {id}: {value}")]
    InvalidValue {
        id: MovieId,
        field: String,
        value: String,
    },

    /// Two records share the same identifier
    #[error("Duplicate movie id {0} in catalog")]
    DuplicateMovie(MovieId),

    /// The catalog holds no records, so no vector space can be built
    #[error("Catalog is empty")]
    EmptyCatalog,

    /// Backing store could not be reached
    #[error("Catalog repository unavailable: {0}")]
    Unavailable(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
