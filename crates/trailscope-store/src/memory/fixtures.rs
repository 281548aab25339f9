//! GeoJSON fixture loaders for seeding the in-memory stores.
//!
//! Each loader reads a `FeatureCollection`. Features that cannot be turned
//! into a record are skipped with a warning rather than failing the load.

use geojson::{Feature, FeatureCollection, GeoJson};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use trailscope_core::error::{Result, TrailscopeError};
use trailscope_core::models::{
    BoundaryCategory, BoundaryEntity, BoundaryId, EntityId, EntityKind, Geometry, LocatedEntity,
    Trail, TrailId,
};

use super::{MemoryBoundaryStore, MemoryEntityStore, MemoryTrailStore};

/// Fixture files used to seed the in-memory stores
///
/// Entity IDs are shared across the city, town and POI files; a later file
/// replaces earlier entities carrying the same ID.
#[derive(Debug, Clone, Default)]
pub struct FixturePaths {
    pub cities: Option<PathBuf>,
    pub towns: Option<PathBuf>,
    pub pois: Option<PathBuf>,
    pub trails: Option<PathBuf>,
    pub boundaries: Option<PathBuf>,
}

/// Records held by the stores after [`FixturePaths::load_into`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixtureCounts {
    pub entities: usize,
    pub trails: usize,
    pub boundaries: usize,
}

impl FixturePaths {
    pub fn is_empty(&self) -> bool {
        self.cities.is_none()
            && self.towns.is_none()
            && self.pois.is_none()
            && self.trails.is_none()
            && self.boundaries.is_none()
    }

    /// Load every configured file into the given stores
    pub fn load_into(
        &self,
        entities: &MemoryEntityStore,
        trails: &MemoryTrailStore,
        boundaries: &MemoryBoundaryStore,
    ) -> Result<FixtureCounts> {
        let entity_files = [
            (&self.cities, EntityKind::City),
            (&self.towns, EntityKind::Town),
            (&self.pois, EntityKind::PointOfInterest),
        ];

        let mut loaded_entities = 0;
        for (path, kind) in entity_files {
            let Some(path) = path else { continue };
            let loaded = load_entities(path, kind)?;
            tracing::info!(
                path = %path.display(),
                kind = kind.as_str(),
                count = loaded.len(),
                "Loaded entity fixtures"
            );
            loaded_entities += loaded.len();
            entities.extend(loaded)?;
        }

        let stored_entities = entities.len()?;
        if stored_entities < loaded_entities {
            tracing::warn!(
                replaced = loaded_entities - stored_entities,
                "Entity fixtures share IDs; later files replaced earlier entities"
            );
        }

        if let Some(path) = &self.trails {
            let loaded = load_trails(path)?;
            tracing::info!(path = %path.display(), count = loaded.len(), "Loaded trail fixtures");
            trails.extend(loaded)?;
        }

        if let Some(path) = &self.boundaries {
            let loaded = load_boundaries(path)?;
            tracing::info!(
                path = %path.display(),
                count = loaded.len(),
                "Loaded boundary fixtures"
            );
            boundaries.extend(loaded)?;
        }

        Ok(FixtureCounts {
            entities: stored_entities,
            trails: trails.len()?,
            boundaries: boundaries.len()?,
        })
    }
}

/// Parse a GeoJSON document that must be a FeatureCollection
pub fn parse_feature_collection(content: &str) -> Result<FeatureCollection> {
    let geojson: GeoJson = content
        .parse()
        .map_err(|e| TrailscopeError::Serialization(format!("Failed to parse GeoJSON: {}", e)))?;

    match geojson {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        GeoJson::Feature(_) => Err(TrailscopeError::Serialization(
            "Expected a FeatureCollection, got a Feature".to_string(),
        )),
        GeoJson::Geometry(_) => Err(TrailscopeError::Serialization(
            "Expected a FeatureCollection, got a bare Geometry".to_string(),
        )),
    }
}

/// Load point entities of one kind from a GeoJSON file
pub fn load_entities<P: AsRef<Path>>(path: P, kind: EntityKind) -> Result<Vec<LocatedEntity>> {
    entities_from_str(&std::fs::read_to_string(path)?, kind)
}

/// Load trails from a GeoJSON file
pub fn load_trails<P: AsRef<Path>>(path: P) -> Result<Vec<Trail>> {
    trails_from_str(&std::fs::read_to_string(path)?)
}

/// Load boundaries from a GeoJSON file
pub fn load_boundaries<P: AsRef<Path>>(path: P) -> Result<Vec<BoundaryEntity>> {
    boundaries_from_str(&std::fs::read_to_string(path)?)
}

/// Point entities from a FeatureCollection of Point features.
///
/// Recognized properties: `name`, `population`, `country`, `region` (or
/// `county`), `category` (or `town_type` / `poi_type`), `area_km2`.
pub fn entities_from_str(content: &str, kind: EntityKind) -> Result<Vec<LocatedEntity>> {
    let fc = parse_feature_collection(content)?;

    let entities = fc
        .features
        .iter()
        .enumerate()
        .filter_map(|(idx, feature)| {
            let id = EntityId(feature_id(feature, idx));
            let Some(Geometry::Point { coordinates: [lon, lat] }) = feature_geometry(feature) else {
                tracing::warn!(id = %id, "Skipping entity without a Point geometry");
                return None;
            };

            let props = properties(feature);
            Some(LocatedEntity {
                population: number(props, "population").map(|p| p.max(0.0).round() as u64),
                country: text(props, &["country"]),
                region: text(props, &["region", "county"]),
                category: text(props, &["category", "town_type", "poi_type"]),
                area_km2: number(props, "area_km2"),
                ..LocatedEntity::new(id, kind, display_name(props, idx), lon, lat)
            })
        })
        .collect();

    Ok(entities)
}

/// Trails from a FeatureCollection of LineString / MultiLineString features.
///
/// The first path coordinate is the start point. A Point feature yields a
/// trail with a start point but no path; a null geometry yields neither.
pub fn trails_from_str(content: &str) -> Result<Vec<Trail>> {
    let fc = parse_feature_collection(content)?;

    let trails = fc
        .features
        .iter()
        .enumerate()
        .filter_map(|(idx, feature)| {
            let props = properties(feature);
            let mut trail = Trail {
                region: text(props, &["region", "county"]),
                difficulty: text(props, &["difficulty"]),
                length_km: number(props, "length_km"),
                ..Trail::new(TrailId(feature_id(feature, idx)), display_name(props, idx))
            };

            match feature_geometry(feature) {
                Some(Geometry::Point { coordinates }) => trail.start_point = Some(coordinates),
                Some(path @ (Geometry::LineString { .. } | Geometry::MultiLineString { .. })) => {
                    trail.start_point = first_coordinate(&path);
                    trail.path = Some(path);
                }
                Some(other) => {
                    tracing::warn!(
                        id = %trail.id.0,
                        geometry_type = ?other.geometry_type(),
                        "Skipping trail with unsupported geometry"
                    );
                    return None;
                }
                None => {}
            }

            Some(trail)
        })
        .collect();

    Ok(trails)
}

/// Boundaries from a FeatureCollection; each feature needs a `category`
/// property naming a [`BoundaryCategory`].
pub fn boundaries_from_str(content: &str) -> Result<Vec<BoundaryEntity>> {
    let fc = parse_feature_collection(content)?;

    let boundaries = fc
        .features
        .iter()
        .enumerate()
        .filter_map(|(idx, feature)| {
            let id = BoundaryId(feature_id(feature, idx));
            let props = properties(feature);

            let category = match text(props, &["category"]).map(|c| c.parse::<BoundaryCategory>()) {
                Some(Ok(category)) => category,
                Some(Err(e)) => {
                    tracing::warn!(id = %id, error = %e, "Skipping boundary with unknown category");
                    return None;
                }
                None => {
                    tracing::warn!(id = %id, "Skipping boundary without a category");
                    return None;
                }
            };

            let Some(geometry) = feature_geometry(feature) else {
                tracing::warn!(id = %id, "Skipping boundary without geometry");
                return None;
            };

            Some(BoundaryEntity { id, name: display_name(props, idx), category, geometry })
        })
        .collect();

    Ok(boundaries)
}

/// Feature ID, then `id` property, then 1-based position
fn feature_id(feature: &Feature, idx: usize) -> u64 {
    let from_feature = feature.id.as_ref().and_then(|id| match id {
        geojson::feature::Id::Number(n) => n.as_u64(),
        geojson::feature::Id::String(s) => s.parse().ok(),
    });

    from_feature
        .or_else(|| feature.properties.as_ref().and_then(|p| p.get("id")).and_then(Value::as_u64))
        .unwrap_or(idx as u64 + 1)
}

fn feature_geometry(feature: &Feature) -> Option<Geometry> {
    feature
        .geometry
        .as_ref()
        .and_then(|geom| serde_json::to_value(geom).ok())
        .and_then(|value| Geometry::from_geojson(&value))
}

fn first_coordinate(geometry: &Geometry) -> Option<[f64; 2]> {
    match geometry {
        Geometry::LineString { coordinates } => coordinates.first().copied(),
        Geometry::MultiLineString { coordinates } => coordinates.first()?.first().copied(),
        _ => None,
    }
}

fn properties(feature: &Feature) -> Option<&Map<String, Value>> {
    feature.properties.as_ref()
}

fn text(props: Option<&Map<String, Value>>, keys: &[&str]) -> Option<String> {
    let props = props?;
    keys.iter()
        .filter_map(|key| props.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn number(props: Option<&Map<String, Value>>, key: &str) -> Option<f64> {
    props?.get(key).and_then(Value::as_f64).filter(|v| v.is_finite())
}

fn display_name(props: Option<&Map<String, Value>>, idx: usize) -> String {
    text(props, &["name"]).unwrap_or_else(|| format!("Unnamed {}", idx + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOWNS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": 10,
                "geometry": {"type": "Point", "coordinates": [-6.25, 53.35]},
                "properties": {
                    "name": "Dublin",
                    "population": 592713,
                    "country": "Ireland",
                    "county": "Dublin"
                }
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-8.47, 51.90]},
                "properties": {"name": "Cork", "town_type": "city"}
            },
            {
                "type": "Feature",
                "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]},
                "properties": {"name": "Not a town"}
            }
        ]
    }"#;

    #[test]
    fn test_entities_from_str() {
        let towns = entities_from_str(TOWNS, EntityKind::Town).unwrap();

        assert_eq!(towns.len(), 2);
        assert_eq!(towns[0].id, EntityId(10));
        assert_eq!(towns[0].population, Some(592_713));
        assert_eq!(towns[0].region.as_deref(), Some("Dublin"));
        assert_eq!(towns[1].id, EntityId(2));
        assert_eq!(towns[1].category.as_deref(), Some("city"));
        assert_eq!(towns[1].population, None);
    }

    #[test]
    fn test_trails_from_str() {
        let content = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {"type": "LineString", "coordinates": [[-9.5, 52.0], [-9.4, 52.1]]},
                    "properties": {
                        "id": 3,
                        "name": "Kerry Way",
                        "county": "Kerry",
                        "length_km": 214.0
                    }
                },
                {
                    "type": "Feature",
                    "geometry": null,
                    "properties": {"name": "Unmapped"}
                }
            ]
        }"#;

        let trails = trails_from_str(content).unwrap();
        assert_eq!(trails.len(), 2);
        assert_eq!(trails[0].id, TrailId(3));
        assert_eq!(trails[0].start_point, Some([-9.5, 52.0]));
        assert_eq!(trails[0].length_km, Some(214.0));
        assert!(trails[0].has_path());
        assert!(!trails[1].has_path());
        assert_eq!(trails[1].start_point, None);
    }

    #[test]
    fn test_boundaries_skip_unknown_category() {
        let content = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {"type": "LineString", "coordinates": [[-8.0, 52.6], [-7.9, 54.2]]},
                    "properties": {"name": "River Shannon", "category": "river"}
                },
                {
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [0, 0]},
                    "properties": {"name": "Atlantis", "category": "ocean"}
                }
            ]
        }"#;

        let boundaries = boundaries_from_str(content).unwrap();
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].category, BoundaryCategory::River);
    }

    #[test]
    fn test_rejects_non_collection() {
        let err = entities_from_str(r#"{"type": "Point", "coordinates": [0, 0]}"#, EntityKind::Town)
            .unwrap_err();
        assert!(err.to_string().contains("FeatureCollection"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("towns.geojson");
        std::fs::write(&path, TOWNS).unwrap();

        let towns = load_entities(&path, EntityKind::Town).unwrap();
        assert_eq!(towns.len(), 2);
    }

    #[test]
    fn test_fixture_paths_load_into() {
        let dir = tempfile::tempdir().unwrap();
        let towns = dir.path().join("towns.geojson");
        std::fs::write(&towns, TOWNS).unwrap();

        let paths = FixturePaths { towns: Some(towns), ..Default::default() };
        assert!(!paths.is_empty());
        assert!(FixturePaths::default().is_empty());

        let (entities, trails, boundaries) =
            (MemoryEntityStore::new(), MemoryTrailStore::new(), MemoryBoundaryStore::new());
        let counts = paths.load_into(&entities, &trails, &boundaries).unwrap();

        assert_eq!(counts, FixtureCounts { entities: 2, trails: 0, boundaries: 0 });
    }

    #[test]
    fn test_fixture_paths_missing_file() {
        let paths = FixturePaths {
            trails: Some(PathBuf::from("/nonexistent/trails.geojson")),
            ..Default::default()
        };
        let result = paths.load_into(
            &MemoryEntityStore::new(),
            &MemoryTrailStore::new(),
            &MemoryBoundaryStore::new(),
        );

        assert!(matches!(result, Err(TrailscopeError::Io(_))));
    }
}
