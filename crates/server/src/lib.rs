//! Server crate for the ReelRecs content-similarity recommender.
//!
//! This crate contains the engine lifecycle, the orchestrator that answers
//! both kinds of recommendation query, and the HTTP surface in front of it.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod orchestrator;

pub use config::Config;
pub use engine::{Engine, EngineHandle};
pub use error::{RecommendError, RecommendResult};
pub use orchestrator::RecommendationOrchestrator;
