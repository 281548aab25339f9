use trailscope_core::models::BoundingBox;

use crate::dto::{
    BoundingBoxRequest, NearbyPoi, NearbyTrail, NearestTownRequest, NearestTownResponse,
    PoiRadiusRequest, PoiRadiusResponse, RadiusSearchRequest, SearchPoint, TrailSummary,
    TrailsInBboxResponse, TrailsWithinRadiusResponse,
};
use crate::error::ApiError;
use crate::state::AppState;

/// Service for point, radius and bounding-box lookups
pub struct ProximityService;

impl ProximityService {
    pub async fn trails_within_radius(
        state: &AppState,
        request: &RadiusSearchRequest,
    ) -> Result<TrailsWithinRadiusResponse, ApiError> {
        let (lat, lon) = request.point()?;
        let radius_km = request.radius_km.unwrap_or(state.proximity.settings().trail_radius_km);

        let found = state.proximity.trails_within_radius(lat, lon, Some(radius_km)).await?;

        Ok(TrailsWithinRadiusResponse {
            search_point: SearchPoint { lat, lng: lon },
            radius_km,
            total_found: found.len(),
            nearest_trails: found.iter().map(NearbyTrail::from).collect(),
        })
    }

    pub async fn trails_in_bbox(
        state: &AppState,
        request: BoundingBoxRequest,
    ) -> Result<TrailsInBboxResponse, ApiError> {
        let bbox = BoundingBox::new(
            request.min_longitude,
            request.min_latitude,
            request.max_longitude,
            request.max_latitude,
        );

        let trails = state.proximity.trails_in_bbox(bbox).await?;

        Ok(TrailsInBboxResponse {
            bounding_box: request,
            count: trails.len(),
            trails: trails.iter().map(TrailSummary::from).collect(),
        })
    }

    pub async fn nearest_town(
        state: &AppState,
        request: &NearestTownRequest,
    ) -> Result<NearestTownResponse, ApiError> {
        let (lat, lon) = request.point()?;

        let nearest = state
            .proximity
            .nearest_town(lat, lon)
            .await?
            .ok_or_else(|| ApiError::not_found("No towns found"))?;

        Ok(NearestTownResponse::from(&nearest))
    }

    pub async fn pois_in_radius(
        state: &AppState,
        request: &PoiRadiusRequest,
    ) -> Result<PoiRadiusResponse, ApiError> {
        let (lat, lon) = request.point()?;
        let radius_km = request.radius_km.unwrap_or(state.proximity.settings().poi_radius_km);

        let found = state
            .proximity
            .pois_in_radius(lat, lon, Some(radius_km), request.poi_type.as_deref())
            .await?;

        Ok(PoiRadiusResponse {
            search_point: SearchPoint { lat, lng: lon },
            radius_km,
            poi_type: request.poi_type.clone(),
            total_found: found.len(),
            pois: found.iter().map(NearbyPoi::from).collect(),
        })
    }
}
