//! Vector spaces: one fitted vectorizer plus one row per catalog movie.

use crate::sparse::SparseVector;
use crate::tfidf::TfidfVectorizer;
use data_loader::{Catalog, MovieRecord};
use std::fmt;

/// The text channel a vector space is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Leading genres joined by spaces
    Genres,
    Keywords,
    Overview,
    /// `keywords overview genre|genre|genre`, used for neighbor lookup
    Combined,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Genres => "genres",
            Field::Keywords => "keywords",
            Field::Overview => "overview",
            Field::Combined => "combined",
        }
    }

    /// Derive this channel's document text for one movie.
    pub fn document(&self, movie: &MovieRecord) -> String {
        match self {
            Field::Genres => movie.significant_genres().join(" "),
            Field::Keywords => movie.keywords.clone(),
            Field::Overview => movie.overview.clone(),
            Field::Combined => format!(
                "{} {} {}",
                movie.keywords,
                movie.overview,
                movie.significant_genres().join("|")
            ),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fitted TF-IDF model and its row matrix.
///
/// Row `i` is always catalog row `i`; movies with empty text get a zero row
/// rather than being skipped.
#[derive(Debug, Clone)]
pub struct VectorSpace {
    field: Field,
    vectorizer: TfidfVectorizer,
    rows: Vec<SparseVector>,
}

impl VectorSpace {
    /// Fit a fresh vocabulary to one field of every catalog movie.
    pub fn fit(field: Field, catalog: &Catalog) -> Self {
        let documents: Vec<String> = catalog.iter().map(|movie| field.document(movie)).collect();
        let (vectorizer, rows) = TfidfVectorizer::fit_transform(&documents);
        Self {
            field,
            vectorizer,
            rows,
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&SparseVector> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.vocabulary_size()
    }

    /// Vectorize arbitrary text in this space's vocabulary
    pub fn transform(&self, text: &str) -> SparseVector {
        self.vectorizer.transform(text)
    }
}
