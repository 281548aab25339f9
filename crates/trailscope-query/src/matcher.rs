//! Multi-strategy polygon matcher.
//!
//! Three candidate predicates run concurrently against the entity store:
//! `within`, `intersects` and a bounding-box containment test. Each one is
//! bounded by its own timeout and may fail on its own. The returned entities
//! come from `within` when it found anything, otherwise from `intersects`
//! when that found anything, otherwise nothing (reported as `within`).
//! The bounding-box count is diagnostic only.

use chrono::Utc;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use trailscope_core::config::LayeredConfig;
use trailscope_core::error::{Result, TrailscopeError};
use trailscope_core::models::{
    EntityKind, Geometry, LocatedEntity, MatchFilters, PolygonAnalysisRecord, Ring, SpatialFilter,
    SpatialPredicate,
};
use trailscope_geo::measure::{approx_area_km2, population_density};
use trailscope_geo::normalize_polygon;
use trailscope_store::ports::{AnalysisLog, EntityStore};
use uuid::Uuid;

use crate::error::PredicateError;
use crate::models::{
    CandidateReport, MatchDiagnostics, MatchStatistics, MatchStrategy, PolygonSearchResult,
};
use crate::observer::{MatchObserver, TracingObserver};

type CandidateOutcome = std::result::Result<Vec<LocatedEntity>, PredicateError>;

/// Matcher settings
#[derive(Debug, Clone)]
pub struct MatcherSettings {
    /// Layer the predicates run against
    pub kind: EntityKind,
    pub predicate_timeout: Duration,
    pub audit_enabled: bool,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self::from_config(&LayeredConfig::default())
    }
}

impl MatcherSettings {
    pub fn from_config(config: &LayeredConfig) -> Self {
        Self {
            kind: EntityKind::City,
            predicate_timeout: config.predicate_timeout(),
            audit_enabled: config.audit_enabled.value,
        }
    }
}

/// Who asked, for the audit record
#[derive(Debug, Clone, Default)]
pub struct AuditContext {
    pub session_key: Option<String>,
    pub client_ip: Option<String>,
}

/// Polygon matcher over an entity store
pub struct PolygonMatcher {
    entities: Arc<dyn EntityStore>,
    audit_log: Option<Arc<dyn AnalysisLog>>,
    observer: Arc<dyn MatchObserver>,
    settings: MatcherSettings,
    pending_audits: Mutex<JoinSet<()>>,
}

impl PolygonMatcher {
    /// Create a matcher with default settings, tracing observer and no audit log
    pub fn new(entities: Arc<dyn EntityStore>) -> Self {
        Self {
            entities,
            audit_log: None,
            observer: Arc::new(TracingObserver),
            settings: MatcherSettings::default(),
            pending_audits: Mutex::new(JoinSet::new()),
        }
    }

    pub fn with_audit_log(mut self, audit_log: Arc<dyn AnalysisLog>) -> Self {
        self.audit_log = Some(audit_log);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn MatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_settings(mut self, settings: MatcherSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &MatcherSettings {
        &self.settings
    }

    /// Normalize a raw polygon payload and search it.
    ///
    /// The audit record is written on a background task, so a slow audit
    /// store never delays the result. Use [`Self::finish_audits`] to wait for it.
    ///
    /// # Errors
    ///
    /// Payload shape errors from normalization, or
    /// [`TrailscopeError::AllPredicatesFailed`] when no candidate completed.
    pub async fn search_payload(
        &self,
        payload: &Value,
        filters: &MatchFilters,
        context: AuditContext,
    ) -> Result<PolygonSearchResult> {
        let normalized = normalize_polygon(payload)?;
        let result = self.search(&normalized.ring, filters).await?;

        self.audit(payload, &result, context);
        Ok(result)
    }

    /// Wait for every audit write started so far
    pub async fn finish_audits(&self) {
        let mut pending = std::mem::take(&mut *self.lock_pending());
        while pending.join_next().await.is_some() {}
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, JoinSet<()>> {
        self.pending_audits.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Search an already normalized ring. Writes no audit record.
    pub async fn search(&self, ring: &Ring, filters: &MatchFilters) -> Result<PolygonSearchResult> {
        let started = Instant::now();
        let polygon = ring.to_polygon();

        let (within, intersects, bbox) = tokio::join!(
            self.run_candidate(SpatialPredicate::Within, &polygon),
            self.run_candidate(SpatialPredicate::Intersects, &polygon),
            self.run_candidate(SpatialPredicate::BoundingBox, &polygon),
        );

        if let (Err(w), Err(i), Err(b)) = (&within, &intersects, &bbox) {
            return Err(TrailscopeError::AllPredicatesFailed {
                details: format!("within: {}; intersects: {}; bbox: {}", w, i, b),
            });
        }

        let within_report = CandidateReport::from_outcome(SpatialPredicate::Within, &within);
        let intersects_report =
            CandidateReport::from_outcome(SpatialPredicate::Intersects, &intersects);
        let bbox_report = CandidateReport::from_outcome(SpatialPredicate::BoundingBox, &bbox);

        let (used_method, selected) = select_candidate(within, intersects);
        let diagnostics = MatchDiagnostics {
            within: within_report,
            intersects: intersects_report,
            bbox: bbox_report,
            used_method,
        };
        self.observer.strategy_selected(&diagnostics);

        let entities: Vec<LocatedEntity> =
            selected.into_iter().filter(|entity| filters.accepts(entity)).collect();
        let statistics = compute_statistics(&entities, ring);

        Ok(PolygonSearchResult {
            ring: ring.clone(),
            entities,
            statistics,
            diagnostics,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }

    async fn run_candidate(
        &self,
        predicate: SpatialPredicate,
        polygon: &Geometry,
    ) -> CandidateOutcome {
        let filter = SpatialFilter::new(predicate).geometry(polygon.clone());
        let timeout = self.settings.predicate_timeout;
        let started = Instant::now();

        let query = self.entities.locate(self.settings.kind, &filter);
        let outcome = match tokio::time::timeout(timeout, query).await {
            Ok(Ok(entities)) => Ok(entities),
            Ok(Err(e)) => Err(PredicateError::Store(e.to_string())),
            Err(_) => Err(PredicateError::TimedOut { after_ms: timeout.as_millis() as u64 }),
        };

        match &outcome {
            Ok(entities) => {
                self.observer.predicate_completed(predicate, entities.len(), started.elapsed())
            }
            Err(e) => self.observer.predicate_failed(predicate, e),
        }

        outcome
    }

    /// Spawn the audit write. Failures and timeouts go to the observer only.
    fn audit(&self, payload: &Value, result: &PolygonSearchResult, context: AuditContext) {
        let Some(log) = self.audit_log.clone().filter(|_| self.settings.audit_enabled) else {
            return;
        };

        let record = PolygonAnalysisRecord {
            id: Uuid::new_v4(),
            polygon_payload: payload.to_string(),
            polygon: result.ring.to_polygon(),
            entity_count: result.statistics.total_entities,
            total_population: result.statistics.total_population,
            average_population: result.statistics.average_population,
            area_km2: result.statistics.area_km2,
            duration_ms: result.duration_ms,
            session_key: context.session_key,
            client_ip: context.client_ip,
            recorded_at: Utc::now(),
        };

        let observer = Arc::clone(&self.observer);
        let timeout = self.settings.predicate_timeout;

        let mut pending = self.lock_pending();
        // Reap finished writes so the set only holds in-flight ones
        while pending.try_join_next().is_some() {}
        pending.spawn(async move {
            let error = match tokio::time::timeout(timeout, log.record(&record)).await {
                Ok(Ok(())) => return,
                Ok(Err(e)) => e,
                Err(_) => TrailscopeError::Storage("audit write timed out".to_string()),
            };
            observer.audit_failed(&error);
        });
    }
}

/// Pick the returned candidate: non-empty `within`, then non-empty
/// `intersects`, then the (empty) `within` result.
pub fn select_candidate(
    within: CandidateOutcome,
    intersects: CandidateOutcome,
) -> (MatchStrategy, Vec<LocatedEntity>) {
    match (within, intersects) {
        (Ok(found), _) if !found.is_empty() => (MatchStrategy::Within, found),
        (_, Ok(found)) if !found.is_empty() => (MatchStrategy::Intersects, found),
        _ => (MatchStrategy::Within, Vec::new()),
    }
}

/// Statistics over the filtered entities and the searched ring
pub fn compute_statistics(entities: &[LocatedEntity], ring: &Ring) -> MatchStatistics {
    let populations: Vec<u64> = entities.iter().filter_map(|e| e.population).collect();
    let total_population: u64 = populations.iter().sum();
    let average_population = if populations.is_empty() {
        0.0
    } else {
        total_population as f64 / populations.len() as f64
    };
    let area_km2 = approx_area_km2(ring);

    MatchStatistics {
        total_entities: entities.len(),
        total_population,
        average_population,
        area_km2,
        population_density: population_density(total_population, area_km2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailscope_core::models::EntityId;

    fn city(id: u64, population: Option<u64>) -> LocatedEntity {
        let name = format!("City {}", id);
        let entity = LocatedEntity::new(EntityId(id), EntityKind::City, name, 0.5, 0.5);
        LocatedEntity { population, ..entity }
    }

    fn unit_square() -> Ring {
        Ring::closed(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])
    }

    #[test]
    fn test_within_wins_when_non_empty() {
        let (strategy, selected) =
            select_candidate(Ok(vec![city(1, None)]), Ok(vec![city(1, None), city(2, None)]));

        assert_eq!(strategy, MatchStrategy::Within);
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_intersects_used_when_within_empty() {
        let (strategy, selected) = select_candidate(Ok(vec![]), Ok(vec![city(2, None)]));

        assert_eq!(strategy, MatchStrategy::Intersects);
        assert_eq!(selected[0].id, EntityId(2));
    }

    #[test]
    fn test_intersects_used_when_within_failed() {
        let (strategy, _) = select_candidate(
            Err(PredicateError::Store("boom".to_string())),
            Ok(vec![city(2, None)]),
        );

        assert_eq!(strategy, MatchStrategy::Intersects);
    }

    #[test]
    fn test_both_empty_reports_within() {
        let (strategy, selected) = select_candidate(
            Ok(vec![]),
            Err(PredicateError::TimedOut { after_ms: 10 }),
        );

        assert_eq!(strategy, MatchStrategy::Within);
        assert!(selected.is_empty());
    }

    #[test]
    fn test_statistics_average_skips_missing_population() {
        let entities = [city(1, Some(1000)), city(2, None), city(3, Some(3000))];
        let stats = compute_statistics(&entities, &unit_square());

        assert_eq!(stats.total_entities, 3);
        assert_eq!(stats.total_population, 4000);
        assert_eq!(stats.average_population, 2000.0);
        assert!((stats.area_km2 - 111.32 * 111.32).abs() < 1e-9);
        assert!((stats.population_density - 4000.0 / (111.32 * 111.32)).abs() < 1e-12);
    }

    #[test]
    fn test_statistics_on_degenerate_ring() {
        let line = Ring::closed(vec![[0.0, 0.0], [1.0, 1.0]]);
        let stats = compute_statistics(&[city(1, Some(500))], &line);

        assert_eq!(stats.area_km2, 0.0);
        assert_eq!(stats.population_density, 0.0);
    }

    #[test]
    fn test_statistics_empty() {
        let stats = compute_statistics(&[], &unit_square());

        let expected = MatchStatistics { area_km2: stats.area_km2, ..MatchStatistics::default() };
        assert_eq!(stats, expected);
    }
}
