//! Hooks the query components report through instead of a global logger.

use std::time::Duration;
use trailscope_core::error::TrailscopeError;
use trailscope_core::models::SpatialPredicate;

use crate::error::PredicateError;
use crate::models::MatchDiagnostics;

/// Receives query progress events. Every method defaults to doing nothing.
pub trait MatchObserver: Send + Sync {
    fn predicate_completed(
        &self,
        _predicate: SpatialPredicate,
        _count: usize,
        _elapsed: Duration,
    ) {
    }

    fn predicate_failed(&self, _predicate: SpatialPredicate, _error: &PredicateError) {}

    fn strategy_selected(&self, _diagnostics: &MatchDiagnostics) {}

    fn audit_failed(&self, _error: &TrailscopeError) {}

    /// A boundary lookup missed and trails were matched on their region label
    fn label_fallback(&self, _name: &str) {}
}

/// Default observer, forwarding events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl MatchObserver for TracingObserver {
    fn predicate_completed(&self, predicate: SpatialPredicate, count: usize, elapsed: Duration) {
        tracing::debug!(
            predicate = predicate.as_str(),
            count,
            elapsed_ms = elapsed.as_millis() as u64,
            "Candidate predicate completed"
        );
    }

    fn predicate_failed(&self, predicate: SpatialPredicate, error: &PredicateError) {
        tracing::warn!(
            predicate = predicate.as_str(),
            error = %error,
            "Candidate predicate failed"
        );
    }

    fn strategy_selected(&self, diagnostics: &MatchDiagnostics) {
        tracing::info!(
            used_method = diagnostics.used_method.as_str(),
            within_count = diagnostics.within.count,
            intersects_count = diagnostics.intersects.count,
            bbox_count = diagnostics.bbox.count,
            "Polygon match strategy selected"
        );
    }

    fn audit_failed(&self, error: &TrailscopeError) {
        tracing::warn!(error = %error, "Failed to record polygon analysis");
    }

    fn label_fallback(&self, name: &str) {
        tracing::warn!(name, "Boundary not found, matching trails on region label");
    }
}
