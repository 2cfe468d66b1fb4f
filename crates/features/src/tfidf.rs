//! TF-IDF vectorizer.
//!
//! Weight of term `t` in document `d`:
//!
//! ```text
//! tf(t, d) * (ln((1 + n) / (1 + df(t))) + 1)
//! ```
//!
//! where `tf` is the raw count, `n` the number of fitted documents and `df`
//! the number of documents containing `t`. Rows are L2-normalized.
//! Vocabulary columns are assigned in lexicographic term order.

use crate::sparse::SparseVector;
use crate::tokenize::tokenize;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};

/// A fitted term-weighting model. Immutable after [`fit`](Self::fit).
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, u32>,
    idf: Vec<f32>,
    documents: usize,
}

impl TfidfVectorizer {
    /// Fit vocabulary and idf weights to a corpus.
    pub fn fit<S: AsRef<str> + Sync>(documents: &[S]) -> Self {
        let tokenized = tokenize_all(documents);
        Self::fit_tokens(&tokenized)
    }

    /// Fit and vectorize the same corpus; rows line up with `documents`.
    pub fn fit_transform<S: AsRef<str> + Sync>(documents: &[S]) -> (Self, Vec<SparseVector>) {
        let tokenized = tokenize_all(documents);
        let vectorizer = Self::fit_tokens(&tokenized);
        let rows = tokenized
            .par_iter()
            .map(|tokens| vectorizer.transform_tokens(tokens))
            .collect();
        (vectorizer, rows)
    }

    fn fit_tokens(tokenized: &[Vec<String>]) -> Self {
        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in tokenized {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let n = tokenized.len() as f64;
        let mut vocabulary = HashMap::with_capacity(doc_freq.len());
        let mut idf = Vec::with_capacity(doc_freq.len());
        // BTreeMap iterates in sorted order, which fixes the column layout
        for (column, (term, df)) in doc_freq.into_iter().enumerate() {
            vocabulary.insert(term.to_string(), column as u32);
            idf.push((((1.0 + n) / (1.0 + df as f64)).ln() + 1.0) as f32);
        }

        Self {
            vocabulary,
            idf,
            documents: tokenized.len(),
        }
    }

    /// Vectorize new text against the fitted vocabulary.
    ///
    /// Terms never seen during fitting are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        self.transform_tokens(&tokenize(text))
    }

    fn transform_tokens(&self, tokens: &[String]) -> SparseVector {
        let mut counts: BTreeMap<u32, f32> = BTreeMap::new();
        for token in tokens {
            if let Some(&column) = self.vocabulary.get(token) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        let (indices, values): (Vec<u32>, Vec<f32>) = counts
            .into_iter()
            .map(|(column, count)| (column, count * self.idf[column as usize]))
            .unzip();

        let mut vector = SparseVector::new(indices, values);
        vector.normalize();
        vector
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    /// Number of documents the model was fitted on
    pub fn documents(&self) -> usize {
        self.documents
    }

    pub fn column_of(&self, term: &str) -> Option<u32> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf_of(&self, term: &str) -> Option<f32> {
        self.column_of(term).map(|column| self.idf[column as usize])
    }
}

fn tokenize_all<S: AsRef<str> + Sync>(documents: &[S]) -> Vec<Vec<String>> {
    documents
        .par_iter()
        .map(|doc| tokenize(doc.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::cosine_similarity;

    #[test]
    fn test_vocabulary_is_sorted() {
        let vectorizer = TfidfVectorizer::fit(&["zebra apple", "mango"]);
        assert_eq!(vectorizer.column_of("apple"), Some(0));
        assert_eq!(vectorizer.column_of("mango"), Some(1));
        assert_eq!(vectorizer.column_of("zebra"), Some(2));
        assert_eq!(vectorizer.vocabulary_size(), 3);
    }

    #[test]
    fn test_smoothed_idf() {
        let vectorizer = TfidfVectorizer::fit(&["action drama", "action", "comedy"]);

        // n = 3: action df = 2, drama df = 1
        let action = vectorizer.idf_of("action").unwrap();
        let drama = vectorizer.idf_of("drama").unwrap();
        assert!((action - ((4.0f32 / 3.0).ln() + 1.0)).abs() < 1e-6);
        assert!((drama - (2.0f32.ln() + 1.0)).abs() < 1e-6);
        assert!(drama > action);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let (_, rows) = TfidfVectorizer::fit_transform(&["hero war", "hero battle hero"]);
        for row in &rows {
            assert!((row.norm() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_term_counts_weight_rows() {
        let (vectorizer, rows) = TfidfVectorizer::fit_transform(&["hero hero war", "war"]);
        let hero = vectorizer.column_of("hero").unwrap();
        let war = vectorizer.column_of("war").unwrap();
        assert!(rows[0].get(hero) > rows[0].get(war));
    }

    #[test]
    fn test_empty_document_yields_zero_row() {
        let (_, rows) = TfidfVectorizer::fit_transform(&["hero", "", "the and of"]);
        assert_eq!(rows.len(), 3);
        assert!(rows[1].is_zero());
        assert!(rows[2].is_zero());
    }

    #[test]
    fn test_transform_matches_fitted_row() {
        let docs = ["a soldier returns", "a soldier fights", "a clown performs"];
        let (vectorizer, rows) = TfidfVectorizer::fit_transform(&docs);
        assert_eq!(vectorizer.transform(docs[1]), rows[1]);
        assert_eq!(vectorizer.documents(), 3);
    }

    #[test]
    fn test_unknown_terms_ignored() {
        let vectorizer = TfidfVectorizer::fit(&["hero war"]);
        assert!(vectorizer.transform("spaceship").is_zero());
    }

    #[test]
    fn test_shared_terms_drive_similarity() {
        let (_, rows) =
            TfidfVectorizer::fit_transform(&["hero war", "hero battle", "laugh"]);
        assert!(cosine_similarity(&rows[0], &rows[1]) > 0.0);
        assert_eq!(cosine_similarity(&rows[0], &rows[2]), 0.0);
    }
}
