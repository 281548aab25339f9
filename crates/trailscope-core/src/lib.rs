//! Trailscope Core - Domain models, error taxonomy, and configuration
//!
//! This crate contains the shared vocabulary of the trailscope system: the
//! canonical geometry representation, the entities spatial queries run over,
//! and the layered configuration for query behaviour.

pub mod config;
pub mod error;
pub mod models;

pub use error::{Result, TrailscopeError};
