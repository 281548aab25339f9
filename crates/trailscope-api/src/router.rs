use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Polygon search
        .route("/api/v1/polygon-search", post(handlers::polygon_search))

        // Proximity
        .route("/api/v1/trails/within-radius", post(handlers::trails_within_radius))
        .route("/api/v1/trails/bbox", post(handlers::trails_in_bbox))
        .route("/api/v1/towns/nearest", post(handlers::nearest_town))
        .route("/api/v1/pois/radius-search", post(handlers::pois_in_radius))

        // Statistics
        .route("/api/v1/trails/statistics", get(handlers::trail_statistics))
        .route("/api/v1/analytics", get(handlers::analytics))

        // Boundaries; `{boundary}` is an ID on the first route, a category on the second
        .route(
            "/api/v1/boundaries/{boundary}/trails-crossing",
            get(handlers::trails_crossing_boundary),
        )
        .route(
            "/api/v1/boundaries/{boundary}/{name}/trails",
            get(handlers::trails_by_boundary_name),
        )

        .with_state(state)
}
