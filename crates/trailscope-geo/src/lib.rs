//! Trailscope Geo - Payload normalization, spatial predicates, and planar measures
//!
//! This crate turns loosely-typed polygon input into a canonical ring and
//! evaluates spatial predicates and measurements with the `geo` crate. Every
//! computation is done in longitude/latitude degrees; nothing is reprojected.

pub mod measure;
pub mod models;
pub mod normalize;
pub mod spatial;

pub use normalize::{normalize_polygon, NormalizedPolygon, PayloadShape};
