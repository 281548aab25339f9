use geojson::{Feature, FeatureCollection, JsonObject};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use trailscope_core::models::{
    AnalysisSummary, BoundaryCategory, BoundaryEntity, BoundaryId, LocatedEntity,
    PolygonAnalysisRecord, Ring, SpatialPredicate, Trail,
};

use crate::error::PredicateError;

/// Candidate whose entities a polygon search returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Within,
    Intersects,
}

impl MatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::Within => "within",
            MatchStrategy::Intersects => "intersects",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one candidate predicate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateReport {
    pub predicate: SpatialPredicate,

    /// Matches found; zero when the predicate failed
    pub count: usize,

    /// Failure reason, if the predicate did not complete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CandidateReport {
    pub fn from_outcome(
        predicate: SpatialPredicate,
        outcome: &std::result::Result<Vec<LocatedEntity>, PredicateError>,
    ) -> Self {
        match outcome {
            Ok(entities) => Self { predicate, count: entities.len(), error: None },
            Err(e) => Self { predicate, count: 0, error: Some(e.to_string()) },
        }
    }

    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Per-candidate counts plus the strategy that won
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchDiagnostics {
    pub within: CandidateReport,
    pub intersects: CandidateReport,
    /// Upper bound only; never selected
    pub bbox: CandidateReport,
    pub used_method: MatchStrategy,
}

/// Summary statistics over the filtered entities
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MatchStatistics {
    pub total_entities: usize,
    pub total_population: u64,

    /// Mean over entities that carry a population, zero when none do
    pub average_population: f64,

    /// Planar area scaled by 111.32², not geodesic
    pub area_km2: f64,
    pub population_density: f64,
}

/// Result of a polygon search
#[derive(Debug, Clone, Serialize)]
pub struct PolygonSearchResult {
    /// Closed ring the predicates ran against
    pub ring: Ring,

    /// Selected candidate after filters
    pub entities: Vec<LocatedEntity>,

    pub statistics: MatchStatistics,
    pub diagnostics: MatchDiagnostics,

    /// Wall time from predicate start to statistics, audit excluded
    pub duration_ms: u64,
}

impl PolygonSearchResult {
    /// Matched entities as a GeoJSON FeatureCollection of points
    pub fn to_feature_collection(&self) -> FeatureCollection {
        entities_to_feature_collection(&self.entities)
    }
}

/// How a boundary query reached its trails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Geometry predicates against the boundary
    Spatial,
    /// Boundary not found; trails matched on their region label instead
    LabelFallback,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Spatial => "spatial",
            MatchKind::LabelFallback => "label_fallback",
        }
    }
}

/// Identity of the boundary a query ran against
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundarySummary {
    pub id: BoundaryId,
    pub name: String,
    pub category: BoundaryCategory,
}

impl From<&BoundaryEntity> for BoundarySummary {
    fn from(boundary: &BoundaryEntity) -> Self {
        Self { id: boundary.id, name: boundary.name.clone(), category: boundary.category }
    }
}

/// Trails crossing and inside a boundary
#[derive(Debug, Clone, Serialize)]
pub struct BoundaryMatch {
    /// `None` for a label fallback
    pub boundary: Option<BoundarySummary>,
    pub crossing: Vec<Trail>,
    pub within: Vec<Trail>,
    pub match_kind: MatchKind,
}

impl BoundaryMatch {
    pub fn crossing_count(&self) -> usize {
        self.crossing.len()
    }

    pub fn within_count(&self) -> usize {
        self.within.len()
    }

    pub fn is_fallback(&self) -> bool {
        self.match_kind == MatchKind::LabelFallback
    }
}

/// A trail with its distance from the query point
#[derive(Debug, Clone, Serialize)]
pub struct TrailDistance {
    pub trail: Trail,
    pub distance_km: f64,
}

/// An entity with its distance from the query point
#[derive(Debug, Clone, Serialize)]
pub struct EntityDistance {
    pub entity: LocatedEntity,
    pub distance_km: f64,
}

/// Layer sizes plus polygon search audit aggregates
#[derive(Debug, Clone, Serialize)]
pub struct SearchAnalytics {
    pub total_cities: usize,
    pub total_towns: usize,
    pub summary: AnalysisSummary,

    /// Newest first
    pub recent: Vec<PolygonAnalysisRecord>,
}

pub fn entities_to_feature_collection(entities: &[LocatedEntity]) -> FeatureCollection {
    let features = entities
        .iter()
        .map(|entity| {
            let mut properties = JsonObject::new();
            properties.insert("name".to_string(), json!(entity.name));
            properties.insert("kind".to_string(), json!(entity.kind.as_str()));
            properties.insert("population".to_string(), json!(entity.population));
            properties.insert("country".to_string(), json!(entity.country));
            properties.insert("region".to_string(), json!(entity.region));

            Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::Point(
                    entity.location.to_vec(),
                ))),
                id: Some(geojson::feature::Id::Number(entity.id.0.into())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection { bbox: None, features, foreign_members: None }
}

/// Trails as a FeatureCollection of their paths; a missing path becomes a null geometry
pub fn trails_to_feature_collection(trails: &[Trail]) -> FeatureCollection {
    let features = trails
        .iter()
        .map(|trail| {
            let mut properties = JsonObject::new();
            properties.insert("name".to_string(), json!(trail.name));
            properties.insert("region".to_string(), json!(trail.region));
            properties.insert("difficulty".to_string(), json!(trail.difficulty));
            properties.insert("length_km".to_string(), json!(trail.length_km));

            let geometry = trail
                .path
                .as_ref()
                .and_then(|path| geojson::Geometry::from_json_value(path.to_geojson()).ok());

            Feature {
                bbox: None,
                geometry,
                id: Some(geojson::feature::Id::Number(trail.id.0.into())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection { bbox: None, features, foreign_members: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailscope_core::models::{EntityId, EntityKind, Geometry, TrailId};

    #[test]
    fn test_candidate_report_from_failure() {
        let report = CandidateReport::from_outcome(
            SpatialPredicate::Intersects,
            &Err(PredicateError::TimedOut { after_ms: 5000 }),
        );

        assert_eq!(report.count, 0);
        assert!(report.failed());
        assert_eq!(report.error.as_deref(), Some("timed out after 5000ms"));
    }

    #[test]
    fn test_entity_features() {
        let dublin = LocatedEntity::new(EntityId(5), EntityKind::City, "Dublin", -6.25, 53.35)
            .with_population(1000);
        let entities = vec![dublin];
        let fc = entities_to_feature_collection(&entities);
        let value = serde_json::to_value(&fc).unwrap();

        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"][0]["geometry"]["coordinates"], json!([-6.25, 53.35]));
        assert_eq!(value["features"][0]["properties"]["population"], 1000);
        assert_eq!(value["features"][0]["id"], 5);
    }

    #[test]
    fn test_trail_without_path_has_null_geometry() {
        let trails = vec![
            Trail::new(TrailId(1), "Wicklow Way")
                .with_path(Geometry::line_string(vec![[-6.3, 53.2], [-6.4, 52.9]])),
            Trail::new(TrailId(2), "Unmapped"),
        ];
        let value = serde_json::to_value(trails_to_feature_collection(&trails)).unwrap();

        assert_eq!(value["features"][0]["geometry"]["type"], "LineString");
        assert!(value["features"][1]["geometry"].is_null());
    }

    #[test]
    fn test_strategy_wire_names() {
        assert_eq!(serde_json::to_value(MatchStrategy::Within).unwrap(), "within");
        assert_eq!(MatchKind::LabelFallback.as_str(), "label_fallback");
    }
}
