//! Trailscope Query - spatial query use cases
//!
//! This crate implements the polygon matcher, the boundary crossing query and
//! the proximity and statistics queries on top of the storage ports.

pub mod boundary;
pub mod error;
pub mod matcher;
pub mod models;
pub mod observer;
pub mod proximity;
pub mod statistics;

pub use boundary::BoundaryQuery;
pub use error::PredicateError;
pub use matcher::{AuditContext, MatcherSettings, PolygonMatcher};
pub use models::{
    BoundaryMatch, BoundarySummary, CandidateReport, EntityDistance, MatchDiagnostics, MatchKind,
    MatchStatistics, MatchStrategy, PolygonSearchResult, SearchAnalytics, TrailDistance,
};
pub use observer::{MatchObserver, TracingObserver};
pub use proximity::{ProximityQuery, ProximitySettings};
pub use statistics::{StatisticsQuery, RECENT_WINDOW_DAYS};
