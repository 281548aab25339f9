//! Aggregate reports over the stored trails and the polygon search audit trail.

use chrono::{Duration, Utc};
use std::sync::Arc;
use trailscope_core::error::Result;
use trailscope_core::models::{EntityKind, TrailStatistics};
use trailscope_store::ports::{AnalysisLog, EntityStore, TrailStore};

use crate::models::SearchAnalytics;

/// Window the analytics report counts as "recent"
pub const RECENT_WINDOW_DAYS: i64 = 7;

pub struct StatisticsQuery {
    entities: Arc<dyn EntityStore>,
    trails: Arc<dyn TrailStore>,
    analysis_log: Arc<dyn AnalysisLog>,
}

impl StatisticsQuery {
    pub fn new(
        entities: Arc<dyn EntityStore>,
        trails: Arc<dyn TrailStore>,
        analysis_log: Arc<dyn AnalysisLog>,
    ) -> Self {
        Self { entities, trails, analysis_log }
    }

    /// Trail totals, average length and difficulty counts
    pub async fn trail_statistics(&self) -> Result<TrailStatistics> {
        self.trails.statistics().await
    }

    /// Layer sizes, audit aggregates and the `latest` most recent searches
    pub async fn search_analytics(&self, latest: usize) -> Result<SearchAnalytics> {
        let since = Utc::now() - Duration::days(RECENT_WINDOW_DAYS);

        let (cities, towns, summary, recent) = tokio::try_join!(
            self.entities.count(EntityKind::City),
            self.entities.count(EntityKind::Town),
            self.analysis_log.summary(since),
            self.analysis_log.recent(latest),
        )?;

        tracing::debug!(
            total_analyses = summary.total_analyses,
            recent_analyses = summary.analyses_since,
            "Computed search analytics"
        );

        Ok(SearchAnalytics { total_cities: cities, total_towns: towns, summary, recent })
    }
}
