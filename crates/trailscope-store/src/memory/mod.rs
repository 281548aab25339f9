//! In-memory storage implementations for development and testing.
//!
//! Poisoned locks surface as [`TrailscopeError::Storage`]. For production
//! workloads, use the PostgreSQL backend.

pub mod fixtures;
pub mod index;

pub use fixtures::{FixtureCounts, FixturePaths};
pub use index::PointIndex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use trailscope_core::error::{Result, TrailscopeError};
use trailscope_core::models::{
    AnalysisSummary, BoundaryCategory, BoundaryEntity, BoundaryId, EntityId, EntityKind, Geometry,
    LocatedEntity, PolygonAnalysisRecord, SpatialFilter, SpatialPredicate, Trail, TrailId,
    TrailStatistics,
};
use trailscope_geo::models::GeometryExt;
use trailscope_geo::spatial::evaluate_spatial_filter;

use crate::ports::{AnalysisLog, BoundaryStore, EntityStore, TrailStore};

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|_| TrailscopeError::Storage("memory store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|_| TrailscopeError::Storage("memory store lock poisoned".to_string()))
}

/// In-memory implementation of EntityStore
#[derive(Debug, Clone, Default)]
pub struct MemoryEntityStore {
    entities: Arc<RwLock<BTreeMap<EntityId, LocatedEntity>>>,
    indexes: Arc<RwLock<HashMap<EntityKind, PointIndex>>>,
}

impl MemoryEntityStore {
    /// Create a new in-memory entity store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given entities
    pub fn with_entities(entities: Vec<LocatedEntity>) -> Result<Self> {
        let store = Self::new();
        store.extend(entities)?;
        Ok(store)
    }

    /// Insert or replace an entity
    pub fn insert(&self, entity: LocatedEntity) -> Result<()> {
        self.extend(std::iter::once(entity))
    }

    /// Insert or replace a batch of entities
    pub fn extend(&self, entities: impl IntoIterator<Item = LocatedEntity>) -> Result<()> {
        let mut stored = write(&self.entities)?;
        let mut indexes = write(&self.indexes)?;

        for entity in entities {
            if let Some(previous) = stored.get(&entity.id) {
                if let Some(index) = indexes.get_mut(&previous.kind) {
                    index.remove(previous.id);
                }
            }
            indexes.entry(entity.kind).or_default().insert(entity.id, entity.location);
            stored.insert(entity.id, entity);
        }

        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(read(&self.entities)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(read(&self.entities)?.is_empty())
    }

    /// IDs worth testing against the filter, narrowed by the index when the
    /// filter geometry bounds every possible match
    fn candidates(
        &self,
        kind: EntityKind,
        filter: &SpatialFilter,
    ) -> Result<Option<Vec<EntityId>>> {
        let narrows = matches!(
            filter.predicate,
            SpatialPredicate::Within | SpatialPredicate::Intersects | SpatialPredicate::BoundingBox
        );
        let extent = filter.geometry.as_ref().and_then(|g| g.extent());

        match (narrows, extent) {
            (true, Some(extent)) => {
                let indexes = read(&self.indexes)?;
                Ok(Some(
                    indexes
                        .get(&kind)
                        .map(|index| {
                            index.query_bbox(
                                [extent.min_lon, extent.min_lat],
                                [extent.max_lon, extent.max_lat],
                            )
                        })
                        .unwrap_or_default(),
                ))
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    async fn locate(&self, kind: EntityKind, filter: &SpatialFilter) -> Result<Vec<LocatedEntity>> {
        let candidates = self.candidates(kind, filter)?;
        let entities = read(&self.entities)?;

        let matches = |entity: &&LocatedEntity| {
            entity.kind == kind
                && evaluate_spatial_filter(
                    &Geometry::point(entity.longitude(), entity.latitude()),
                    filter,
                )
        };

        let mut results: Vec<LocatedEntity> = match candidates {
            Some(ids) => {
                ids.iter().filter_map(|id| entities.get(id)).filter(matches).cloned().collect()
            }
            None => entities.values().filter(matches).cloned().collect(),
        };
        results.sort_by_key(|e| e.id);

        Ok(results)
    }

    async fn nearest(
        &self,
        kind: EntityKind,
        point: [f64; 2],
        limit: usize,
    ) -> Result<Vec<LocatedEntity>> {
        let ids = read(&self.indexes)?
            .get(&kind)
            .map(|index| index.query_k_nearest(point, limit))
            .unwrap_or_default();

        let entities = read(&self.entities)?;
        Ok(ids.iter().filter_map(|id| entities.get(id).cloned()).collect())
    }

    async fn count(&self, kind: EntityKind) -> Result<usize> {
        Ok(read(&self.indexes)?.get(&kind).map(PointIndex::len).unwrap_or(0))
    }
}

/// In-memory implementation of TrailStore
#[derive(Debug, Clone, Default)]
pub struct MemoryTrailStore {
    trails: Arc<RwLock<BTreeMap<TrailId, Trail>>>,
}

impl MemoryTrailStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trails(trails: Vec<Trail>) -> Result<Self> {
        let store = Self::new();
        store.extend(trails)?;
        Ok(store)
    }

    pub fn insert(&self, trail: Trail) -> Result<()> {
        self.extend(std::iter::once(trail))
    }

    pub fn extend(&self, trails: impl IntoIterator<Item = Trail>) -> Result<()> {
        let mut stored = write(&self.trails)?;
        for trail in trails {
            stored.insert(trail.id, trail);
        }
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(read(&self.trails)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(read(&self.trails)?.is_empty())
    }
}

#[async_trait]
impl TrailStore for MemoryTrailStore {
    async fn trails_by_start(&self, filter: &SpatialFilter) -> Result<Vec<Trail>> {
        let trails = read(&self.trails)?;

        Ok(trails
            .values()
            .filter(|trail| match trail.start_point {
                Some([lon, lat]) => evaluate_spatial_filter(&Geometry::point(lon, lat), filter),
                None => false,
            })
            .cloned()
            .collect())
    }

    async fn trails_by_path(&self, filter: &SpatialFilter) -> Result<Vec<Trail>> {
        let trails = read(&self.trails)?;

        Ok(trails
            .values()
            .filter(|trail| match &trail.path {
                Some(path) => evaluate_spatial_filter(path, filter),
                None => false,
            })
            .cloned()
            .collect())
    }

    async fn trails_by_region(&self, label: &str) -> Result<Vec<Trail>> {
        let wanted = label.trim().to_lowercase();
        let trails = read(&self.trails)?;

        Ok(trails
            .values()
            .filter(|trail| {
                trail.region.as_deref().map(|r| r.trim().to_lowercase() == wanted).unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn statistics(&self) -> Result<TrailStatistics> {
        Ok(TrailStatistics::from_trails(read(&self.trails)?.values()))
    }
}

/// In-memory implementation of BoundaryStore
#[derive(Debug, Clone, Default)]
pub struct MemoryBoundaryStore {
    boundaries: Arc<RwLock<BTreeMap<BoundaryId, BoundaryEntity>>>,
}

impl MemoryBoundaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_boundaries(boundaries: Vec<BoundaryEntity>) -> Result<Self> {
        let store = Self::new();
        store.extend(boundaries)?;
        Ok(store)
    }

    pub fn insert(&self, boundary: BoundaryEntity) -> Result<()> {
        self.extend(std::iter::once(boundary))
    }

    pub fn extend(&self, boundaries: impl IntoIterator<Item = BoundaryEntity>) -> Result<()> {
        let mut stored = write(&self.boundaries)?;
        for boundary in boundaries {
            stored.insert(boundary.id, boundary);
        }
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(read(&self.boundaries)?.len())
    }
}

#[async_trait]
impl BoundaryStore for MemoryBoundaryStore {
    async fn get_boundary(&self, id: BoundaryId) -> Result<Option<BoundaryEntity>> {
        Ok(read(&self.boundaries)?.get(&id).cloned())
    }

    async fn find_boundary(
        &self,
        name: &str,
        category: BoundaryCategory,
    ) -> Result<Option<BoundaryEntity>> {
        let wanted = name.to_lowercase();
        let boundaries = read(&self.boundaries)?;

        Ok(boundaries
            .values()
            .find(|b| b.category == category && b.name.to_lowercase() == wanted)
            .cloned())
    }
}

/// In-memory implementation of AnalysisLog
#[derive(Debug, Clone, Default)]
pub struct MemoryAnalysisLog {
    records: Arc<RwLock<Vec<PolygonAnalysisRecord>>>,
}

impl MemoryAnalysisLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(read(&self.records)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(read(&self.records)?.is_empty())
    }
}

#[async_trait]
impl AnalysisLog for MemoryAnalysisLog {
    async fn record(&self, record: &PolygonAnalysisRecord) -> Result<()> {
        write(&self.records)?.push(record.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<PolygonAnalysisRecord>> {
        let records = read(&self.records)?;
        Ok(records.iter().rev().take(limit).cloned().collect())
    }

    async fn summary(&self, since: DateTime<Utc>) -> Result<AnalysisSummary> {
        Ok(AnalysisSummary::from_records(read(&self.records)?.iter(), since))
    }
}
