use thiserror::Error;

/// Failure of a single candidate predicate.
///
/// Recovered inside the matcher: the candidate counts as empty and the
/// remaining predicates still decide the result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredicateError {
    #[error("store query failed: {0}")]
    Store(String),

    #[error("timed out after {after_ms}ms")]
    TimedOut { after_ms: u64 },
}
