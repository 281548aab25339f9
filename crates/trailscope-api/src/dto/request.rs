use serde::{Deserialize, Serialize};
use serde_json::Value;
use trailscope_core::models::MatchFilters;

use crate::error::ApiError;

/// Polygon search request body
///
/// `polygon` is left untyped; the normalizer decides which shape it is.
#[derive(Debug, Deserialize)]
pub struct PolygonSearchRequest {
    #[serde(default)]
    pub polygon: Option<Value>,
    #[serde(default)]
    pub filters: Option<MatchFilters>,
}

/// A query point with an optional radius
#[derive(Debug, Deserialize)]
pub struct RadiusSearchRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_km: Option<f64>,
}

impl RadiusSearchRequest {
    pub fn point(&self) -> Result<(f64, f64), ApiError> {
        required_point(self.latitude, self.longitude)
    }
}

#[derive(Debug, Deserialize)]
pub struct NearestTownRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl NearestTownRequest {
    pub fn point(&self) -> Result<(f64, f64), ApiError> {
        required_point(self.latitude, self.longitude)
    }
}

#[derive(Debug, Deserialize)]
pub struct PoiRadiusRequest {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_km: Option<f64>,
    pub poi_type: Option<String>,
}

impl PoiRadiusRequest {
    pub fn point(&self) -> Result<(f64, f64), ApiError> {
        required_point(self.latitude, self.longitude)
    }
}

/// Bounding box request body, echoed back in the response
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct BoundingBoxRequest {
    pub min_longitude: f64,
    pub min_latitude: f64,
    pub max_longitude: f64,
    pub max_latitude: f64,
}

/// Query string of the analytics endpoint
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsParams {
    /// How many of the latest searches to list
    pub recent: Option<usize>,
}

impl AnalyticsParams {
    pub const DEFAULT_RECENT: usize = 10;
    pub const MAX_RECENT: usize = 100;

    pub fn recent(&self) -> usize {
        self.recent.unwrap_or(Self::DEFAULT_RECENT).min(Self::MAX_RECENT)
    }
}

fn required_point(latitude: Option<f64>, longitude: Option<f64>) -> Result<(f64, f64), ApiError> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) => Ok((lat, lon)),
        _ => Err(ApiError::bad_request("Latitude and longitude required")),
    }
}
