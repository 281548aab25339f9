use trailscope_query::AuditContext;

use crate::dto::{PolygonSearchRequest, PolygonSearchResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Service for polygon searches
pub struct SearchService;

impl SearchService {
    /// Normalize the request polygon, match it and shape the response
    pub async fn polygon_search(
        state: &AppState,
        request: PolygonSearchRequest,
        context: AuditContext,
    ) -> Result<PolygonSearchResponse, ApiError> {
        let polygon = request.polygon.ok_or_else(|| ApiError::bad_request("No polygon provided"))?;
        let filters = request.filters.unwrap_or_default();

        let result = state.matcher.search_payload(&polygon, &filters, context).await?;

        let sample: Vec<&str> = result.entities.iter().take(10).map(|e| e.name.as_str()).collect();
        tracing::info!(
            found = result.entities.len(),
            used_method = %result.diagnostics.used_method,
            duration_ms = result.duration_ms,
            sample = ?sample,
            "Polygon search completed"
        );

        Ok(PolygonSearchResponse::from(&result))
    }
}
