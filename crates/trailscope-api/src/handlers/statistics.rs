use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::dto::{AnalyticsParams, AnalyticsResponse, TrailStatisticsResponse};
use crate::error::ApiError;
use crate::services::StatisticsService;
use crate::state::AppState;

pub async fn trail_statistics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TrailStatisticsResponse>, ApiError> {
    Ok(Json(StatisticsService::trail_statistics(&state).await?))
}

pub async fn analytics(
    State(state): State<Arc<AppState>>,
    params: Result<Query<AnalyticsParams>, QueryRejection>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let Query(params) = params?;
    tracing::debug!(recent = params.recent(), "Processing analytics request");

    Ok(Json(StatisticsService::analytics(&state, &params).await?))
}
