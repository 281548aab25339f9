use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use trailscope_query::AuditContext;

use crate::dto::{PolygonSearchRequest, PolygonSearchResponse};
use crate::error::ApiError;
use crate::services::SearchService;
use crate::state::AppState;

pub async fn polygon_search(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<PolygonSearchRequest>, JsonRejection>,
) -> Result<Json<PolygonSearchResponse>, ApiError> {
    let Json(request) = payload?;

    tracing::info!(
        has_polygon = request.polygon.is_some(),
        has_filters = request.filters.is_some(),
        "Processing polygon search request"
    );

    let response = SearchService::polygon_search(&state, request, audit_context(&headers)).await?;

    Ok(Json(response))
}

/// Session and client address for the audit record
fn audit_context(headers: &HeaderMap) -> AuditContext {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    AuditContext {
        session_key: header("x-session-key"),
        client_ip: header("x-forwarded-for")
            .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
            .or_else(|| header("x-real-ip")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_audit_context_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        headers.insert("x-session-key", HeaderValue::from_static("abc123"));

        let context = audit_context(&headers);
        assert_eq!(context.client_ip.as_deref(), Some("203.0.113.7"));
        assert_eq!(context.session_key.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_audit_context_without_headers() {
        let context = audit_context(&HeaderMap::new());
        assert!(context.client_ip.is_none());
        assert!(context.session_key.is_none());
    }
}
