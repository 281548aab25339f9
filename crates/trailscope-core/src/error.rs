//! Error types for trailscope

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrailscopeError {
    // Payload normalization errors
    #[error("Unsupported polygon payload: {reason}")]
    InvalidPayloadShape { reason: String },

    #[error("Empty coordinates")]
    EmptyCoordinates,

    #[error("Unsupported coordinates nesting: {reason}")]
    UnsupportedNesting { reason: String },

    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    // Query errors
    #[error("Boundary not found: {lookup}")]
    BoundaryNotFound { lookup: String },

    #[error("All spatial predicates failed: {details}")]
    AllPredicatesFailed { details: String },

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TrailscopeError {
    /// Whether the error was caused by the caller's input rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TrailscopeError::InvalidPayloadShape { .. }
                | TrailscopeError::EmptyCoordinates
                | TrailscopeError::UnsupportedNesting { .. }
                | TrailscopeError::InvalidGeometry { .. }
                | TrailscopeError::BoundaryNotFound { .. }
        )
    }

    /// Whether the error came out of the polygon payload normalizer.
    pub fn is_payload_error(&self) -> bool {
        matches!(
            self,
            TrailscopeError::InvalidPayloadShape { .. }
                | TrailscopeError::EmptyCoordinates
                | TrailscopeError::UnsupportedNesting { .. }
        )
    }

    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        TrailscopeError::InvalidGeometry { reason: reason.into() }
    }
}

impl From<serde_json::Error> for TrailscopeError {
    fn from(err: serde_json::Error) -> Self {
        TrailscopeError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrailscopeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(TrailscopeError::EmptyCoordinates.is_client_error());
        assert!(TrailscopeError::InvalidPayloadShape { reason: "x".into() }.is_client_error());
        assert!(TrailscopeError::BoundaryNotFound { lookup: "id 4".into() }.is_client_error());
        assert!(!TrailscopeError::Storage("down".into()).is_client_error());
        assert!(!TrailscopeError::AllPredicatesFailed { details: "x".into() }.is_client_error());
    }

    #[test]
    fn test_payload_error_messages() {
        assert_eq!(TrailscopeError::EmptyCoordinates.to_string(), "Empty coordinates");
        let err =
            TrailscopeError::UnsupportedNesting { reason: "first element is a string".into() };
        assert!(err.is_payload_error());
        assert!(err.to_string().contains("first element is a string"));
        assert!(!TrailscopeError::invalid_geometry("radius").is_payload_error());
    }
}
