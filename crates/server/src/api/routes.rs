use axum::{
    Router,
    http::{
        HeaderName, Method,
        header::{ACCEPT, CONTENT_TYPE, ORIGIN},
    },
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::AppState;
use super::handlers;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Profile mode
        .route("/recommend", post(handlers::recommend))
        // Neighbor mode
        .route("/recommendmovies", post(handlers::recommend_movies))
        // Engine lifecycle
        .route("/reload", post(handlers::reload))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
        .with_state(state)
}

/// Any origin; preflight requests are answered by the layer itself
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            ORIGIN,
            ACCEPT,
            CONTENT_TYPE,
            HeaderName::from_static("x-requested-with"),
            HeaderName::from_static("x-csrf-token"),
        ])
}
