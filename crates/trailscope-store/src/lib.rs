//! Trailscope Store - Storage ports and adapters
//!
//! This crate defines the storage ports the query layer reads through and
//! provides an in-memory adapter (fixtures, tests) and a PostGIS adapter.

pub mod memory;
pub mod ports;
pub mod postgres;

pub use ports::{AnalysisLog, BoundaryStore, EntityStore, TrailStore};
