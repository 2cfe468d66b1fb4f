use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use data_loader::DataLoadError;
use similarity::SimilarityError;
use tracing::warn;

/// Errors surfaced by the recommendation facade
#[derive(thiserror::Error, Debug)]
pub enum RecommendError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No match: {0}")]
    NoMatch(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Repository error: {0}")]
    Repository(#[from] DataLoadError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<SimilarityError> for RecommendError {
    fn from(err: SimilarityError) -> Self {
        match err {
            SimilarityError::NoMatch { .. } => RecommendError::NoMatch(err.to_string()),
            SimilarityError::NotFound { .. } => RecommendError::NotFound(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for RecommendError {
    fn from(err: anyhow::Error) -> Self {
        RecommendError::Internal(format!("{:#}", err))
    }
}

impl From<tokio::task::JoinError> for RecommendError {
    fn from(err: tokio::task::JoinError) -> Self {
        RecommendError::Internal(format!("worker task failed: {}", err))
    }
}

impl RecommendError {
    pub fn status(&self) -> StatusCode {
        match self {
            RecommendError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            // Lookup misses are reported as server errors, like every other engine failure
            RecommendError::NoMatch(_)
            | RecommendError::NotFound(_)
            | RecommendError::Repository(_)
            | RecommendError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RecommendError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!("Request failed with {}: {}", status, self);
        (status, self.to_string()).into_response()
    }
}

pub type RecommendResult<T> = Result<T, RecommendError>;
