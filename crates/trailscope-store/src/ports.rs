use async_trait::async_trait;
use chrono::{DateTime, Utc};
use trailscope_core::error::Result;
use trailscope_core::models::{
    AnalysisSummary, BoundaryCategory, BoundaryEntity, BoundaryId, EntityKind, LocatedEntity,
    PolygonAnalysisRecord, SpatialFilter, Trail, TrailStatistics,
};

/// Port for point-bearing entities (towns, cities, points of interest)
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Entities of one kind whose location satisfies the filter.
    ///
    /// A filter without geometry matches every entity of that kind.
    async fn locate(&self, kind: EntityKind, filter: &SpatialFilter) -> Result<Vec<LocatedEntity>>;

    /// Up to `limit` entities closest to `point`, nearest first
    async fn nearest(
        &self,
        kind: EntityKind,
        point: [f64; 2],
        limit: usize,
    ) -> Result<Vec<LocatedEntity>>;

    /// Number of stored entities of one kind
    async fn count(&self, kind: EntityKind) -> Result<usize>;
}

/// Port for trail records
#[async_trait]
pub trait TrailStore: Send + Sync {
    /// Trails whose start point satisfies the filter.
    /// Trails without a start point never match.
    async fn trails_by_start(&self, filter: &SpatialFilter) -> Result<Vec<Trail>>;

    /// Trails whose path satisfies the filter.
    /// Trails without a path never match.
    async fn trails_by_path(&self, filter: &SpatialFilter) -> Result<Vec<Trail>>;

    /// Trails whose region label equals `label`, ignoring case
    async fn trails_by_region(&self, label: &str) -> Result<Vec<Trail>>;

    /// Counts and averages over every stored trail
    async fn statistics(&self) -> Result<TrailStatistics>;
}

/// Port for named reference geometries
#[async_trait]
pub trait BoundaryStore: Send + Sync {
    /// Get a boundary by ID
    async fn get_boundary(&self, id: BoundaryId) -> Result<Option<BoundaryEntity>>;

    /// Find a boundary by case-insensitive exact name within a category
    async fn find_boundary(
        &self,
        name: &str,
        category: BoundaryCategory,
    ) -> Result<Option<BoundaryEntity>>;
}

/// Port for the polygon search audit trail
#[async_trait]
pub trait AnalysisLog: Send + Sync {
    /// Append one record
    async fn record(&self, record: &PolygonAnalysisRecord) -> Result<()>;

    /// Most recent records, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<PolygonAnalysisRecord>>;

    /// Aggregates over every record, counting separately those at or after `since`
    async fn summary(&self, since: DateTime<Utc>) -> Result<AnalysisSummary>;
}
