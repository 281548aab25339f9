//! Radius, bounding-box and nearest-neighbour queries around a point.

use std::cmp::Ordering;
use std::sync::Arc;
use trailscope_core::config::LayeredConfig;
use trailscope_core::error::{Result, TrailscopeError};
use trailscope_core::models::{
    BoundingBox, Distance, EntityKind, Geometry, SpatialFilter, SpatialPredicate, Trail,
};
use trailscope_geo::measure::haversine_km;
use trailscope_store::ports::{EntityStore, TrailStore};

use crate::models::{EntityDistance, TrailDistance};

/// Default radii applied when a request leaves them out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximitySettings {
    pub trail_radius_km: f64,
    pub poi_radius_km: f64,
}

impl Default for ProximitySettings {
    fn default() -> Self {
        Self::from_config(&LayeredConfig::default())
    }
}

impl ProximitySettings {
    pub fn from_config(config: &LayeredConfig) -> Self {
        Self {
            trail_radius_km: config.trail_radius_km.value,
            poi_radius_km: config.poi_radius_km.value,
        }
    }
}

pub struct ProximityQuery {
    entities: Arc<dyn EntityStore>,
    trails: Arc<dyn TrailStore>,
    settings: ProximitySettings,
}

impl ProximityQuery {
    pub fn new(entities: Arc<dyn EntityStore>, trails: Arc<dyn TrailStore>) -> Self {
        Self { entities, trails, settings: ProximitySettings::default() }
    }

    pub fn with_settings(mut self, settings: ProximitySettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &ProximitySettings {
        &self.settings
    }

    /// Trails starting within `radius_km` of the point, nearest first
    pub async fn trails_within_radius(
        &self,
        lat: f64,
        lon: f64,
        radius_km: Option<f64>,
    ) -> Result<Vec<TrailDistance>> {
        let origin = validate_point(lat, lon)?;
        let radius_km = validate_radius(radius_km.unwrap_or(self.settings.trail_radius_km))?;

        let filter = SpatialFilter::new(SpatialPredicate::DWithin)
            .geometry(Geometry::point(lon, lat))
            .distance(Distance::kilometers(radius_km));

        let mut found: Vec<TrailDistance> = self
            .trails
            .trails_by_start(&filter)
            .await?
            .into_iter()
            .filter_map(|trail| {
                let start = trail.start_point?;
                Some(TrailDistance { distance_km: haversine_km(origin, start), trail })
            })
            .collect();

        found.sort_by(|a, b| {
            by_distance(a.distance_km, b.distance_km).then(a.trail.id.cmp(&b.trail.id))
        });
        Ok(found)
    }

    /// Trails starting inside the rectangle, edges included
    pub async fn trails_in_bbox(&self, bbox: BoundingBox) -> Result<Vec<Trail>> {
        if !bbox.is_valid() {
            return Err(TrailscopeError::invalid_geometry(format!(
                "bounding box min must not exceed max: ({}, {}) .. ({}, {})",
                bbox.min_lon, bbox.min_lat, bbox.max_lon, bbox.max_lat
            )));
        }

        let filter = SpatialFilter::new(SpatialPredicate::BoundingBox).geometry(bbox.to_polygon());
        self.trails.trails_by_start(&filter).await
    }

    /// The single nearest town, `None` when there are no towns
    pub async fn nearest_town(&self, lat: f64, lon: f64) -> Result<Option<EntityDistance>> {
        let origin = validate_point(lat, lon)?;

        let nearest = self.entities.nearest(EntityKind::Town, origin, 1).await?;
        Ok(nearest.into_iter().next().map(|entity| EntityDistance {
            distance_km: haversine_km(origin, entity.location),
            entity,
        }))
    }

    /// Points of interest within `radius_km`, optionally of one type, nearest first
    pub async fn pois_in_radius(
        &self,
        lat: f64,
        lon: f64,
        radius_km: Option<f64>,
        poi_type: Option<&str>,
    ) -> Result<Vec<EntityDistance>> {
        let origin = validate_point(lat, lon)?;
        let radius_km = validate_radius(radius_km.unwrap_or(self.settings.poi_radius_km))?;

        let filter = SpatialFilter::new(SpatialPredicate::DWithin)
            .geometry(Geometry::point(lon, lat))
            .distance(Distance::kilometers(radius_km));

        let wanted = poi_type.map(str::trim).filter(|t| !t.is_empty()).map(str::to_lowercase);

        let mut found: Vec<EntityDistance> = self
            .entities
            .locate(EntityKind::PointOfInterest, &filter)
            .await?
            .into_iter()
            .filter(|poi| match &wanted {
                Some(wanted) => {
                    poi.category.as_deref().map(|c| c.to_lowercase() == *wanted).unwrap_or(false)
                }
                None => true,
            })
            .map(|entity| EntityDistance {
                distance_km: haversine_km(origin, entity.location),
                entity,
            })
            .collect();

        found.sort_by(|a, b| {
            by_distance(a.distance_km, b.distance_km).then(a.entity.id.cmp(&b.entity.id))
        });
        Ok(found)
    }
}

/// `[lon, lat]` for a valid WGS 84 position
fn validate_point(lat: f64, lon: f64) -> Result<[f64; 2]> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(TrailscopeError::invalid_geometry("coordinates must be finite numbers"));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(TrailscopeError::invalid_geometry(format!("latitude {} out of range", lat)));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(TrailscopeError::invalid_geometry(format!("longitude {} out of range", lon)));
    }
    Ok([lon, lat])
}

fn validate_radius(radius_km: f64) -> Result<f64> {
    if radius_km.is_finite() && radius_km > 0.0 {
        Ok(radius_km)
    } else {
        Err(TrailscopeError::invalid_geometry(format!(
            "radius must be a positive number of kilometres, got {}",
            radius_km
        )))
    }
}

fn by_distance(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
