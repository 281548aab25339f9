use std::sync::Arc;

use trailscope_core::config::LayeredConfig;
use trailscope_core::error::Result;
use trailscope_query::{
    BoundaryQuery, MatcherSettings, PolygonMatcher, ProximityQuery, ProximitySettings,
    StatisticsQuery,
};
use trailscope_store::memory::{
    FixturePaths, MemoryAnalysisLog, MemoryBoundaryStore, MemoryEntityStore, MemoryTrailStore,
};
use trailscope_store::ports::{AnalysisLog, BoundaryStore, EntityStore, TrailStore};
use trailscope_store::postgres::PostgresStore;

/// Storage backends behind the query services
#[derive(Clone)]
pub struct Stores {
    pub entities: Arc<dyn EntityStore>,
    pub trails: Arc<dyn TrailStore>,
    pub boundaries: Arc<dyn BoundaryStore>,
    pub analysis_log: Arc<dyn AnalysisLog>,
}

impl Stores {
    /// In-memory stores seeded from the given fixture files
    pub fn memory(fixtures: &FixturePaths) -> Result<Self> {
        let entities = MemoryEntityStore::new();
        let trails = MemoryTrailStore::new();
        let boundaries = MemoryBoundaryStore::new();

        if !fixtures.is_empty() {
            let counts = fixtures.load_into(&entities, &trails, &boundaries)?;
            tracing::info!(
                entities = counts.entities,
                trails = counts.trails,
                boundaries = counts.boundaries,
                "Seeded in-memory stores"
            );
        }

        Ok(Self {
            entities: Arc::new(entities),
            trails: Arc::new(trails),
            boundaries: Arc::new(boundaries),
            analysis_log: Arc::new(MemoryAnalysisLog::new()),
        })
    }

    /// One PostGIS store serving every port
    pub fn postgres(store: PostgresStore) -> Self {
        let store = Arc::new(store);
        Self {
            entities: store.clone(),
            trails: store.clone(),
            boundaries: store.clone(),
            analysis_log: store,
        }
    }
}

pub struct AppState {
    pub matcher: PolygonMatcher,
    pub boundaries: BoundaryQuery,
    pub proximity: ProximityQuery,
    pub statistics: StatisticsQuery,
}

impl AppState {
    pub fn new(stores: Stores, config: &LayeredConfig) -> Self {
        let matcher = PolygonMatcher::new(stores.entities.clone())
            .with_audit_log(stores.analysis_log.clone())
            .with_settings(MatcherSettings::from_config(config));

        let boundaries = BoundaryQuery::new(stores.boundaries, stores.trails.clone());

        let statistics = StatisticsQuery::new(
            stores.entities.clone(),
            stores.trails.clone(),
            stores.analysis_log,
        );

        let proximity = ProximityQuery::new(stores.entities, stores.trails)
            .with_settings(ProximitySettings::from_config(config));

        Self { matcher, boundaries, proximity, statistics }
    }
}
