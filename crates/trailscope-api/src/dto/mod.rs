mod request;
mod response;

pub use request::{
    AnalyticsParams, BoundingBoxRequest, NearestTownRequest, PoiRadiusRequest,
    PolygonSearchRequest, RadiusSearchRequest,
};
pub use response::{
    round_to, AnalysisEntry, AnalysisResponse, AnalyticsResponse, BoundaryTrailsResponse,
    CityResponse, DebugResponse, HealthResponse, NearbyPoi, NearbyTrail, NearestTownResponse,
    PoiRadiusResponse, PolygonSearchResponse, PolygonSearchResults, SearchPoint,
    TrailStatisticsResponse, TrailSummary, TrailsInBboxResponse, TrailsWithinRadiusResponse,
};
