//! Point, radius and bounding-box command implementations

use crate::cli::{BboxArgs, PoiArgs, PointArgs, RadiusArgs};
use crate::output::OutputWriter;
use crate::output_types::{PoiRow, TrailRow};
use anyhow::Result;
use trailscope_api::dto::{
    BoundingBoxRequest, NearestTownRequest, PoiRadiusRequest, RadiusSearchRequest,
};
use trailscope_api::services::ProximityService;
use trailscope_api::AppState;

use super::to_anyhow;

pub async fn nearest(args: &PointArgs, state: &AppState, output: &OutputWriter) -> Result<()> {
    let request = NearestTownRequest { latitude: Some(args.lat), longitude: Some(args.lon) };
    let town = ProximityService::nearest_town(state, &request).await.map_err(to_anyhow)?;

    if output.is_json() {
        return output.result(&town);
    }

    output.success(format!("Nearest town: {} ({:.2} km)", town.name, town.distance_km));
    if let Some(town_type) = &town.town_type {
        output.kv("Type", town_type);
    }
    Ok(())
}

pub async fn radius(args: &RadiusArgs, state: &AppState, output: &OutputWriter) -> Result<()> {
    let request = RadiusSearchRequest {
        latitude: Some(args.point.lat),
        longitude: Some(args.point.lon),
        radius_km: args.radius_km,
    };
    let response =
        ProximityService::trails_within_radius(state, &request).await.map_err(to_anyhow)?;

    if output.is_json() {
        return output.result(&response);
    }

    output.info(format!(
        "{} trails within {} km of ({}, {})",
        response.total_found, response.radius_km, args.point.lat, args.point.lon
    ));
    output.table(response.nearest_trails.iter().map(TrailRow::from).collect());
    Ok(())
}

pub async fn pois(args: &PoiArgs, state: &AppState, output: &OutputWriter) -> Result<()> {
    let request = PoiRadiusRequest {
        latitude: Some(args.point.lat),
        longitude: Some(args.point.lon),
        radius_km: args.radius_km,
        poi_type: args.poi_type.clone(),
    };
    let response = ProximityService::pois_in_radius(state, &request).await.map_err(to_anyhow)?;

    if output.is_json() {
        return output.result(&response);
    }

    output.info(format!(
        "{} points of interest within {} km",
        response.total_found, response.radius_km
    ));
    output.table(response.pois.iter().map(PoiRow::from).collect());
    Ok(())
}

pub async fn bbox(args: &BboxArgs, state: &AppState, output: &OutputWriter) -> Result<()> {
    let request = BoundingBoxRequest {
        min_longitude: args.min_lon,
        min_latitude: args.min_lat,
        max_longitude: args.max_lon,
        max_latitude: args.max_lat,
    };
    let response = ProximityService::trails_in_bbox(state, request).await.map_err(to_anyhow)?;

    if output.is_json() {
        return output.result(&response);
    }

    output.info(format!("{} trails start inside the bounding box", response.count));
    output.table(response.trails.iter().map(TrailRow::from).collect());
    Ok(())
}
