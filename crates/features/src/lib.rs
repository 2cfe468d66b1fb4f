//! # Features Crate
//!
//! Turns catalog text into comparable numeric vectors.
//!
//! ## Components
//!
//! - **tokenize**: lowercase word tokenizer with an English stop-word list
//! - **tfidf**: [`TfidfVectorizer`], fitted once per vector space
//! - **sparse**: [`SparseVector`] and cosine similarity/distance
//! - **space**: [`VectorSpace`], a fitted model plus one row per catalog movie
//! - **extractor**: [`Features`], every space built from one catalog snapshot
//!
//! ## Example Usage
//!
//! ```ignore
//! use features::{Features, cosine_similarity};
//!
//! let features = Features::extract(&catalog);
//! let a = features.combined.row(0).unwrap();
//! let b = features.combined.row(1).unwrap();
//! println!("similarity: {:.3}", cosine_similarity(a, b));
//! ```

pub mod extractor;
pub mod space;
pub mod sparse;
pub mod tfidf;
pub mod tokenize;

pub use extractor::{Features, ProfileSpaces};
pub use space::{Field, VectorSpace};
pub use sparse::{SparseVector, cosine_distance, cosine_similarity};
pub use tfidf::TfidfVectorizer;
pub use tokenize::tokenize;
