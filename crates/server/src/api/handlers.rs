use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use data_loader::MovieId;
use pipeline::RecommendationItem;
use similarity::NeighborQuery;

use crate::error::{RecommendError, RecommendResult};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendedTitle {
    pub title: String,
    pub similarity: f32,
}

impl From<RecommendationItem> for RecommendedTitle {
    fn from(item: RecommendationItem) -> Self {
        Self {
            title: item.title,
            similarity: item.similarity,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<RecommendedTitle>,
}

/// A movie id as a JSON number or a numeric string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MovieRef {
    Id(MovieId),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub struct SimilarRequest {
    pub id: Option<MovieRef>,
    /// Looked up by exact, case-insensitive title when no id is given
    pub title: Option<String>,
}

impl SimilarRequest {
    fn into_query(self) -> RecommendResult<NeighborQuery> {
        match (self.id, self.title) {
            (Some(MovieRef::Id(id)), _) => Ok(NeighborQuery::Id(id)),
            (Some(MovieRef::Text(text)), _) => {
                text.trim().parse().map(NeighborQuery::Id).map_err(|_| {
                    RecommendError::InvalidRequest(format!("id '{}' is not a movie id", text))
                })
            }
            (None, Some(title)) if !title.trim().is_empty() => Ok(NeighborQuery::Title(title)),
            _ => Err(RecommendError::InvalidRequest("id is required".to_string())),
        }
    }
}

/// Neighbor pairs serialize as `[title, similarity]`
#[derive(Debug, Serialize)]
pub struct SimilarResponse {
    pub recommendations: Vec<(String, f32)>,
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let movies = state.orchestrator.movie_count().await;
    Json(json!({
        "status": "ok",
        "movies": movies
    }))
}

/// Profile-mode recommendations for a user
pub async fn recommend(
    State(state): State<AppState>,
    request: Option<Json<RecommendRequest>>,
) -> RecommendResult<Json<RecommendResponse>> {
    let user_id = request
        .and_then(|Json(request)| request.user_id)
        .ok_or_else(|| RecommendError::InvalidRequest("user_id is required".to_string()))?;

    let items = state
        .orchestrator
        .recommend_for_user(&user_id, &state.ranking)
        .await?;

    Ok(Json(RecommendResponse {
        recommendations: items.into_iter().map(RecommendedTitle::from).collect(),
    }))
}

/// Neighbor-mode recommendations for one movie
pub async fn recommend_movies(
    State(state): State<AppState>,
    request: Option<Json<SimilarRequest>>,
) -> RecommendResult<Json<SimilarResponse>> {
    let Some(Json(request)) = request else {
        return Err(RecommendError::InvalidRequest("id is required".to_string()));
    };
    let query = request.into_query()?;

    let items = state.orchestrator.recommend_similar_to(query).await?;

    Ok(Json(SimilarResponse {
        recommendations: items
            .into_iter()
            .map(|item| (item.title, item.similarity))
            .collect(),
    }))
}

/// Rebuild the engine from the repository
pub async fn reload(State(state): State<AppState>) -> RecommendResult<Json<Value>> {
    let movies = state.orchestrator.reload().await?;
    Ok(Json(json!({ "movies": movies })))
}
