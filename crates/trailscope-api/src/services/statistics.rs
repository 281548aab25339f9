use trailscope_query::RECENT_WINDOW_DAYS;

use crate::dto::{AnalyticsParams, AnalyticsResponse, TrailStatisticsResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Service for aggregate reports
pub struct StatisticsService;

impl StatisticsService {
    pub async fn trail_statistics(state: &AppState) -> Result<TrailStatisticsResponse, ApiError> {
        let stats = state.statistics.trail_statistics().await?;
        Ok(TrailStatisticsResponse::from(&stats))
    }

    pub async fn analytics(
        state: &AppState,
        params: &AnalyticsParams,
    ) -> Result<AnalyticsResponse, ApiError> {
        let analytics = state.statistics.search_analytics(params.recent()).await?;
        Ok(AnalyticsResponse::new(&analytics, RECENT_WINDOW_DAYS))
    }
}
