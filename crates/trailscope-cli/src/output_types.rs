use serde::Serialize;
use tabled::Tabled;
use trailscope_api::dto::{AnalysisEntry, CityResponse, NearbyPoi, NearbyTrail, TrailSummary};
use trailscope_core::config::ConfigSource;
use trailscope_core::models::{Ring, Trail};
use trailscope_geo::PayloadShape;

/// Output for normalize command
#[derive(Debug, Serialize)]
pub struct NormalizeOutput {
    pub shape: PayloadShape,
    pub point_count: usize,
    pub area_km2: f64,
    pub ring: Ring,
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub settings: Vec<ConfigRow>,
}

#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Setting")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source", display_with = "display_source")]
    pub source: ConfigSource,
}

fn display_source(source: &ConfigSource) -> String {
    match source {
        ConfigSource::Default => "default",
        ConfigSource::File => "file",
        ConfigSource::Environment => "environment",
        ConfigSource::Cli => "cli",
    }
    .to_string()
}

#[derive(Debug, Tabled)]
pub struct RingRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Longitude")]
    pub lon: f64,
    #[tabled(rename = "Latitude")]
    pub lat: f64,
}

#[derive(Debug, Tabled)]
pub struct CityRow {
    #[tabled(rename = "ID")]
    pub id: u64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Country")]
    pub country: String,
    #[tabled(rename = "Population")]
    pub population: u64,
}

impl From<&CityResponse> for CityRow {
    fn from(city: &CityResponse) -> Self {
        Self {
            id: city.id,
            name: city.name.clone(),
            country: city.country.clone(),
            population: city.population,
        }
    }
}

#[derive(Debug, Tabled)]
pub struct AnalysisRow {
    #[tabled(rename = "Recorded")]
    pub recorded_at: String,
    #[tabled(rename = "Cities")]
    pub cities: usize,
    #[tabled(rename = "Population")]
    pub population: u64,
    #[tabled(rename = "Area (km²)")]
    pub area: String,
    #[tabled(rename = "Time (ms)")]
    pub duration_ms: u64,
}

impl From<&AnalysisEntry> for AnalysisRow {
    fn from(entry: &AnalysisEntry) -> Self {
        Self {
            recorded_at: entry.recorded_at.clone(),
            cities: entry.cities_found,
            population: entry.total_population,
            area: format!("{:.2}", entry.area_km2),
            duration_ms: entry.duration_ms,
        }
    }
}

#[derive(Debug, Tabled)]
pub struct TrailRow {
    #[tabled(rename = "ID")]
    pub id: u64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "County")]
    pub county: String,
    #[tabled(rename = "Difficulty")]
    pub difficulty: String,
    #[tabled(rename = "Distance (km)")]
    pub distance: String,
}

impl From<&NearbyTrail> for TrailRow {
    fn from(trail: &NearbyTrail) -> Self {
        Self {
            id: trail.id,
            name: trail.name.clone(),
            county: trail.county.clone().unwrap_or_default(),
            difficulty: trail.difficulty.clone().unwrap_or_default(),
            distance: format!("{:.2}", trail.distance_from_point_km),
        }
    }
}

impl From<&TrailSummary> for TrailRow {
    fn from(trail: &TrailSummary) -> Self {
        Self {
            id: trail.id,
            name: trail.name.clone(),
            county: trail.county.clone().unwrap_or_default(),
            difficulty: trail.difficulty.clone().unwrap_or_default(),
            distance: String::new(),
        }
    }
}

#[derive(Debug, Tabled)]
pub struct PoiRow {
    #[tabled(rename = "ID")]
    pub id: u64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Type")]
    pub poi_type: String,
    #[tabled(rename = "Distance (km)")]
    pub distance: String,
}

impl From<&NearbyPoi> for PoiRow {
    fn from(poi: &NearbyPoi) -> Self {
        Self {
            id: poi.id,
            name: poi.name.clone(),
            poi_type: poi.poi_type.clone().unwrap_or_default(),
            distance: format!("{:.2}", poi.distance_km),
        }
    }
}

#[derive(Debug, Tabled)]
pub struct BoundaryTrailRow {
    #[tabled(rename = "ID")]
    pub id: u64,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Region")]
    pub region: String,
    #[tabled(rename = "Has path")]
    pub has_path: bool,
}

impl From<&Trail> for BoundaryTrailRow {
    fn from(trail: &Trail) -> Self {
        Self {
            id: trail.id.0,
            name: trail.name.clone(),
            region: trail.region.clone().unwrap_or_default(),
            has_path: trail.has_path(),
        }
    }
}
