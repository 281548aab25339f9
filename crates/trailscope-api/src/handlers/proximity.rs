use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::dto::{
    BoundingBoxRequest, NearestTownRequest, NearestTownResponse, PoiRadiusRequest,
    PoiRadiusResponse, RadiusSearchRequest, TrailsInBboxResponse, TrailsWithinRadiusResponse,
};
use crate::error::ApiError;
use crate::services::ProximityService;
use crate::state::AppState;

pub async fn trails_within_radius(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RadiusSearchRequest>, JsonRejection>,
) -> Result<Json<TrailsWithinRadiusResponse>, ApiError> {
    let Json(request) = payload?;
    tracing::info!(
        latitude = ?request.latitude,
        longitude = ?request.longitude,
        radius_km = ?request.radius_km,
        "Processing trails within radius request"
    );

    Ok(Json(ProximityService::trails_within_radius(&state, &request).await?))
}

pub async fn trails_in_bbox(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BoundingBoxRequest>, JsonRejection>,
) -> Result<Json<TrailsInBboxResponse>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(ProximityService::trails_in_bbox(&state, request).await?))
}

pub async fn nearest_town(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NearestTownRequest>, JsonRejection>,
) -> Result<Json<NearestTownResponse>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(ProximityService::nearest_town(&state, &request).await?))
}

pub async fn pois_in_radius(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PoiRadiusRequest>, JsonRejection>,
) -> Result<Json<PoiRadiusResponse>, ApiError> {
    let Json(request) = payload?;
    tracing::info!(
        poi_type = ?request.poi_type,
        radius_km = ?request.radius_km,
        "Processing POI radius search"
    );

    Ok(Json(ProximityService::pois_in_radius(&state, &request).await?))
}
