use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use trailscope_core::models::{BoundaryCategory, BoundaryId};

use crate::dto::BoundaryTrailsResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// Trails crossing and within a boundary looked up by ID
pub async fn trails_crossing_boundary(
    State(state): State<Arc<AppState>>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<BoundaryTrailsResponse>, ApiError> {
    let Path(id) = path?;
    tracing::info!(boundary_id = id, "Processing boundary crossing request");

    let result = state.boundaries.by_id(BoundaryId(id)).await?;
    Ok(Json(BoundaryTrailsResponse::from(&result)))
}

/// Trails crossing and within a named boundary, falling back to region labels
pub async fn trails_by_boundary_name(
    State(state): State<Arc<AppState>>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<BoundaryTrailsResponse>, ApiError> {
    let Path((category, name)) = path?;

    let category = category.parse::<BoundaryCategory>().map_err(|e| {
        ApiError::bad_request("Invalid boundary category").with_details(e.to_string())
    })?;

    tracing::info!(
        category = category.as_str(),
        name = %name,
        "Processing boundary trails request"
    );

    let result = state.boundaries.by_name(&name, category).await?;
    Ok(Json(BoundaryTrailsResponse::from(&result)))
}
