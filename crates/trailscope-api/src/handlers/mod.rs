mod boundary;
mod health;
mod proximity;
mod search;
mod statistics;

pub use boundary::{trails_by_boundary_name, trails_crossing_boundary};
pub use health::health_check;
pub use proximity::{nearest_town, pois_in_radius, trails_in_bbox, trails_within_radius};
pub use search::polygon_search;
pub use statistics::{analytics, trail_statistics};
