pub mod analysis;
pub mod boundary;
pub mod entity;
pub mod geometry;
pub mod trail;

pub use analysis::{AnalysisSummary, MatchFilters, PolygonAnalysisRecord};
pub use boundary::{BoundaryCategory, BoundaryEntity, BoundaryId};
pub use entity::{EntityId, EntityKind, LocatedEntity};
pub use geometry::{
    BoundingBox, Crs, Distance, DistanceUnit, Geometry, GeometryType, Ring, SpatialFilter,
    SpatialPredicate,
};
pub use trail::{Trail, TrailId, TrailStatistics};
