//! Boundary crossing query tests

use std::sync::Arc;
use trailscope_core::error::TrailscopeError;
use trailscope_core::models::{
    BoundaryCategory, BoundaryEntity, BoundaryId, Geometry, Trail, TrailId,
};
use trailscope_query::{BoundaryQuery, MatchKind};
use trailscope_store::memory::{MemoryBoundaryStore, MemoryTrailStore};

fn boundaries() -> Arc<MemoryBoundaryStore> {
    Arc::new(
        MemoryBoundaryStore::with_boundaries(vec![
            BoundaryEntity {
                id: BoundaryId(1),
                name: "River Liffey".to_string(),
                category: BoundaryCategory::River,
                geometry: Geometry::line_string(vec![[-6.5, 53.0], [-6.5, 53.5]]),
            },
            BoundaryEntity {
                id: BoundaryId(2),
                name: "Wicklow Mountains".to_string(),
                category: BoundaryCategory::NationalPark,
                geometry: Geometry::polygon(vec![vec![
                    [-6.6, 52.9],
                    [-6.2, 52.9],
                    [-6.2, 53.2],
                    [-6.6, 53.2],
                    [-6.6, 52.9],
                ]]),
            },
        ])
        .unwrap(),
    )
}

fn trails() -> Arc<MemoryTrailStore> {
    Arc::new(
        MemoryTrailStore::with_trails(vec![
            // Crosses the river and runs inside the park
            Trail::new(TrailId(1), "Glendalough Loop")
                .with_region("Wicklow")
                .with_path(Geometry::line_string(vec![[-6.55, 53.05], [-6.45, 53.05]])),
            // Enters the park from outside
            Trail::new(TrailId(2), "Bray Head")
                .with_region("Wicklow")
                .with_path(Geometry::line_string(vec![[-6.3, 53.1], [-6.0, 53.2]])),
            // Labelled Wicklow but no geometry
            Trail::new(TrailId(3), "Unmapped Wicklow Walk").with_region("wicklow"),
            Trail::new(TrailId(4), "Howth Cliff Path")
                .with_region("Dublin")
                .with_path(Geometry::line_string(vec![[-6.07, 53.38], [-6.05, 53.37]])),
        ])
        .unwrap(),
    )
}

fn query() -> BoundaryQuery {
    BoundaryQuery::new(boundaries(), trails())
}

fn ids(trails: &[Trail]) -> Vec<TrailId> {
    trails.iter().map(|t| t.id).collect()
}

#[tokio::test]
async fn test_river_crossing_by_id() {
    let result = query().by_id(BoundaryId(1)).await.unwrap();

    assert_eq!(result.match_kind, MatchKind::Spatial);
    assert_eq!(ids(&result.crossing), vec![TrailId(1)]);
    assert!(result.within.is_empty());
    assert_eq!(result.boundary.unwrap().name, "River Liffey");
}

#[tokio::test]
async fn test_park_crossing_and_within_by_name() {
    let result =
        query().by_name("wicklow mountains", BoundaryCategory::NationalPark).await.unwrap();

    assert_eq!(result.match_kind, MatchKind::Spatial);
    assert_eq!(ids(&result.crossing), vec![TrailId(1), TrailId(2)]);
    assert_eq!(ids(&result.within), vec![TrailId(1)]);
    assert_eq!(result.crossing_count(), 2);
    assert_eq!(result.within_count(), 1);
}

#[tokio::test]
async fn test_trails_without_path_are_excluded_from_spatial_match() {
    let result = query().by_id(BoundaryId(2)).await.unwrap();

    assert!(!ids(&result.crossing).contains(&TrailId(3)));
    assert!(!ids(&result.within).contains(&TrailId(3)));
}

#[tokio::test]
async fn test_unknown_name_falls_back_to_region_label() {
    let result = query().by_name("Wicklow", BoundaryCategory::County).await.unwrap();

    assert_eq!(result.match_kind, MatchKind::LabelFallback);
    assert!(result.is_fallback());
    assert!(result.boundary.is_none());
    assert_eq!(ids(&result.crossing), vec![TrailId(1), TrailId(2), TrailId(3)]);
    assert_eq!(ids(&result.within), ids(&result.crossing));
}

#[tokio::test]
async fn test_unknown_name_with_no_labels_is_empty_fallback() {
    let result = query().by_name("Leitrim", BoundaryCategory::County).await.unwrap();

    assert!(result.is_fallback());
    assert_eq!(result.crossing_count(), 0);
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let err = query().by_id(BoundaryId(99)).await.unwrap_err();

    assert!(matches!(err, TrailscopeError::BoundaryNotFound { .. }));
    assert!(err.is_client_error());
}
