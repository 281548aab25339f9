use geojson::FeatureCollection;
use serde::Serialize;
use trailscope_core::models::{LocatedEntity, PolygonAnalysisRecord, Trail, TrailStatistics};
use trailscope_query::models::trails_to_feature_collection;
use trailscope_query::{
    BoundaryMatch, BoundarySummary, EntityDistance, MatchKind, MatchStrategy, PolygonSearchResult,
    SearchAnalytics, TrailDistance,
};

use super::request::BoundingBoxRequest;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok", service: "trailscope-api" }
    }
}

/// Polygon search response
#[derive(Debug, Serialize)]
pub struct PolygonSearchResponse {
    pub success: bool,
    pub results: PolygonSearchResults,
}

#[derive(Debug, Serialize)]
pub struct PolygonSearchResults {
    pub geojson: FeatureCollection,
    pub cities: Vec<CityResponse>,
    pub analysis: AnalysisResponse,
}

/// A matched settlement, flattened for map clients
#[derive(Debug, Serialize)]
pub struct CityResponse {
    pub id: u64,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub population: u64,
    pub area_km2: Option<f64>,
    pub city_type: String,
}

impl From<&LocatedEntity> for CityResponse {
    fn from(entity: &LocatedEntity) -> Self {
        Self {
            id: entity.id.0,
            name: entity.name.clone(),
            country: entity.country.clone().unwrap_or_default(),
            latitude: entity.latitude(),
            longitude: entity.longitude(),
            population: entity.population.unwrap_or(0),
            area_km2: entity.area_km2,
            city_type: entity.category.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub total_cities: usize,
    pub total_population: u64,
    pub average_population: f64,
    pub polygon_area_km2: f64,
    pub population_density: f64,
    pub execution_time_ms: u64,
    pub debug: DebugResponse,
}

/// Candidate counts behind the selected strategy
#[derive(Debug, Serialize)]
pub struct DebugResponse {
    pub bbox_count: usize,
    pub within_count: usize,
    pub intersects_count: usize,
    pub used_method: MatchStrategy,
}

impl From<&PolygonSearchResult> for PolygonSearchResponse {
    fn from(result: &PolygonSearchResult) -> Self {
        let stats = &result.statistics;
        let diagnostics = &result.diagnostics;

        let analysis = AnalysisResponse {
            total_cities: stats.total_entities,
            total_population: stats.total_population,
            average_population: round_to(stats.average_population, 0),
            polygon_area_km2: round_to(stats.area_km2, 2),
            population_density: round_to(stats.population_density, 2),
            execution_time_ms: result.duration_ms,
            debug: DebugResponse {
                bbox_count: diagnostics.bbox.count,
                within_count: diagnostics.within.count,
                intersects_count: diagnostics.intersects.count,
                used_method: diagnostics.used_method,
            },
        };

        Self {
            success: true,
            results: PolygonSearchResults {
                geojson: result.to_feature_collection(),
                cities: result.entities.iter().map(CityResponse::from).collect(),
                analysis,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Trails near a point response
#[derive(Debug, Serialize)]
pub struct TrailsWithinRadiusResponse {
    pub search_point: SearchPoint,
    pub radius_km: f64,
    pub total_found: usize,
    pub nearest_trails: Vec<NearbyTrail>,
}

#[derive(Debug, Serialize)]
pub struct NearbyTrail {
    pub id: u64,
    pub name: String,
    pub county: Option<String>,
    pub difficulty: Option<String>,
    pub length_km: Option<f64>,
    pub distance_from_point_km: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<&TrailDistance> for NearbyTrail {
    fn from(found: &TrailDistance) -> Self {
        let trail = &found.trail;
        Self {
            id: trail.id.0,
            name: trail.name.clone(),
            county: trail.region.clone(),
            difficulty: trail.difficulty.clone(),
            length_km: trail.length_km,
            distance_from_point_km: round_to(found.distance_km, 2),
            latitude: trail.start_point.map(|[_, lat]| lat),
            longitude: trail.start_point.map(|[lon, _]| lon),
        }
    }
}

/// Trails in a bounding box response
#[derive(Debug, Serialize)]
pub struct TrailsInBboxResponse {
    pub bounding_box: BoundingBoxRequest,
    pub count: usize,
    pub trails: Vec<TrailSummary>,
}

#[derive(Debug, Serialize)]
pub struct TrailSummary {
    pub id: u64,
    pub name: String,
    pub county: Option<String>,
    pub difficulty: Option<String>,
    pub length_km: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<&Trail> for TrailSummary {
    fn from(trail: &Trail) -> Self {
        Self {
            id: trail.id.0,
            name: trail.name.clone(),
            county: trail.region.clone(),
            difficulty: trail.difficulty.clone(),
            length_km: trail.length_km,
            latitude: trail.start_point.map(|[_, lat]| lat),
            longitude: trail.start_point.map(|[lon, _]| lon),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NearestTownResponse {
    pub name: String,
    pub town_type: Option<String>,
    pub distance_km: f64,
}

impl From<&EntityDistance> for NearestTownResponse {
    fn from(found: &EntityDistance) -> Self {
        Self {
            name: found.entity.name.clone(),
            town_type: found.entity.category.clone(),
            distance_km: round_to(found.distance_km, 2),
        }
    }
}

/// Points of interest near a point response
#[derive(Debug, Serialize)]
pub struct PoiRadiusResponse {
    pub search_point: SearchPoint,
    pub radius_km: f64,
    pub poi_type: Option<String>,
    pub total_found: usize,
    pub pois: Vec<NearbyPoi>,
}

#[derive(Debug, Serialize)]
pub struct NearbyPoi {
    pub id: u64,
    pub name: String,
    pub poi_type: Option<String>,
    pub distance_km: f64,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&EntityDistance> for NearbyPoi {
    fn from(found: &EntityDistance) -> Self {
        Self {
            id: found.entity.id.0,
            name: found.entity.name.clone(),
            poi_type: found.entity.category.clone(),
            distance_km: round_to(found.distance_km, 2),
            latitude: found.entity.latitude(),
            longitude: found.entity.longitude(),
        }
    }
}

/// Trails crossing and within a boundary response
#[derive(Debug, Serialize)]
pub struct BoundaryTrailsResponse {
    pub boundary: Option<BoundarySummary>,
    pub match_kind: MatchKind,
    pub crossing_count: usize,
    pub within_count: usize,
    pub crossing: FeatureCollection,
    pub within: FeatureCollection,
}

impl From<&BoundaryMatch> for BoundaryTrailsResponse {
    fn from(result: &BoundaryMatch) -> Self {
        Self {
            boundary: result.boundary.clone(),
            match_kind: result.match_kind,
            crossing_count: result.crossing_count(),
            within_count: result.within_count(),
            crossing: trails_to_feature_collection(&result.crossing),
            within: trails_to_feature_collection(&result.within),
        }
    }
}

/// Trail statistics response
#[derive(Debug, Serialize)]
pub struct TrailStatisticsResponse {
    pub total_trails: usize,
    pub average_length_km: f64,
    pub easy_trails: usize,
    pub moderate_trails: usize,
    pub hard_trails: usize,
}

impl From<&TrailStatistics> for TrailStatisticsResponse {
    fn from(stats: &TrailStatistics) -> Self {
        Self {
            total_trails: stats.total_trails,
            average_length_km: round_to(stats.average_length_km, 2),
            easy_trails: stats.easy_count,
            moderate_trails: stats.moderate_count,
            hard_trails: stats.hard_count,
        }
    }
}

/// Polygon search analytics response
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub total_cities: usize,
    pub total_towns: usize,
    pub total_analyses: usize,
    pub recent_analyses: usize,
    pub recent_window_days: i64,
    pub average_cities_per_search: f64,
    pub average_query_time_ms: f64,
    pub latest: Vec<AnalysisEntry>,
}

impl AnalyticsResponse {
    pub fn new(analytics: &SearchAnalytics, recent_window_days: i64) -> Self {
        Self {
            total_cities: analytics.total_cities,
            total_towns: analytics.total_towns,
            total_analyses: analytics.summary.total_analyses,
            recent_analyses: analytics.summary.analyses_since,
            recent_window_days,
            average_cities_per_search: round_to(analytics.summary.average_entity_count, 1),
            average_query_time_ms: round_to(analytics.summary.average_duration_ms, 1),
            latest: analytics.recent.iter().map(AnalysisEntry::from).collect(),
        }
    }
}

/// One audited polygon search
#[derive(Debug, Serialize)]
pub struct AnalysisEntry {
    pub id: String,
    pub cities_found: usize,
    pub total_population: u64,
    pub area_km2: f64,
    pub duration_ms: u64,
    pub recorded_at: String,
}

impl From<&PolygonAnalysisRecord> for AnalysisEntry {
    fn from(record: &PolygonAnalysisRecord) -> Self {
        Self {
            id: record.id.to_string(),
            cities_found: record.entity_count,
            total_population: record.total_population,
            area_km2: round_to(record.area_km2, 2),
            duration_ms: record.duration_ms,
            recorded_at: record.recorded_at.to_rfc3339(),
        }
    }
}

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1234.5678, 2), 1234.57);
        assert_eq!(round_to(1234.5, 0), 1235.0);
        assert_eq!(round_to(0.0, 2), 0.0);
    }
}
