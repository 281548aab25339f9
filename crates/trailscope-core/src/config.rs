use crate::error::{Result, TrailscopeError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered query configuration for trailscope
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Upper bound for a single candidate predicate
    pub predicate_timeout_ms: ConfigValue<u64>,
    /// Default radius for trail radius searches
    pub trail_radius_km: ConfigValue<f64>,
    /// Default radius for point-of-interest radius searches
    pub poi_radius_km: ConfigValue<f64>,
    /// Whether polygon searches write an audit record
    pub audit_enabled: ConfigValue<bool>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            predicate_timeout_ms: ConfigValue::new(5_000, ConfigSource::Default),
            trail_radius_km: ConfigValue::new(50.0, ConfigSource::Default),
            poi_radius_km: ConfigValue::new(5.0, ConfigSource::Default),
            audit_enabled: ConfigValue::new(true, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| TrailscopeError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| TrailscopeError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(timeout) = file_config.predicate_timeout_ms {
            self.predicate_timeout_ms.update(validate_timeout(timeout)?, ConfigSource::File);
        }

        if let Some(radius) = file_config.trail_radius_km {
            let radius = validate_radius("trail_radius_km", radius)?;
            self.trail_radius_km.update(radius, ConfigSource::File);
        }

        if let Some(radius) = file_config.poi_radius_km {
            let radius = validate_radius("poi_radius_km", radius)?;
            self.poi_radius_km.update(radius, ConfigSource::File);
        }

        if let Some(enabled) = file_config.audit_enabled {
            self.audit_enabled.update(enabled, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // TRAILSCOPE_PREDICATE_TIMEOUT_MS
        if let Ok(raw) = env::var("TRAILSCOPE_PREDICATE_TIMEOUT_MS") {
            match raw.parse::<u64>().ok().and_then(|v| validate_timeout(v).ok()) {
                Some(timeout) => {
                    self.predicate_timeout_ms.update(timeout, ConfigSource::Environment)
                }
                None => tracing::warn!(
                    "Invalid TRAILSCOPE_PREDICATE_TIMEOUT_MS value '{}': expected milliseconds",
                    raw
                ),
            }
        }

        // TRAILSCOPE_TRAIL_RADIUS_KM
        if let Ok(raw) = env::var("TRAILSCOPE_TRAIL_RADIUS_KM") {
            match parse_radius("trail_radius_km", &raw) {
                Ok(radius) => self.trail_radius_km.update(radius, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid TRAILSCOPE_TRAIL_RADIUS_KM value '{}': expected positive kilometers",
                    raw
                ),
            }
        }

        // TRAILSCOPE_POI_RADIUS_KM
        if let Ok(raw) = env::var("TRAILSCOPE_POI_RADIUS_KM") {
            match parse_radius("poi_radius_km", &raw) {
                Ok(radius) => self.poi_radius_km.update(radius, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid TRAILSCOPE_POI_RADIUS_KM value '{}': expected positive kilometers",
                    raw
                ),
            }
        }

        // TRAILSCOPE_AUDIT_ENABLED
        if let Ok(raw) = env::var("TRAILSCOPE_AUDIT_ENABLED") {
            match parse_bool(&raw) {
                Ok(enabled) => self.audit_enabled.update(enabled, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid TRAILSCOPE_AUDIT_ENABLED value '{}': expected true or false",
                    raw
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(timeout) = overrides.predicate_timeout_ms {
            self.predicate_timeout_ms.update(timeout, ConfigSource::Cli);
        }

        if let Some(radius) = overrides.trail_radius_km {
            self.trail_radius_km.update(radius, ConfigSource::Cli);
        }

        if let Some(radius) = overrides.poi_radius_km {
            self.poi_radius_km.update(radius, ConfigSource::Cli);
        }

        if let Some(enabled) = overrides.audit_enabled {
            self.audit_enabled.update(enabled, ConfigSource::Cli);
        }
    }

    pub fn predicate_timeout(&self) -> Duration {
        Duration::from_millis(self.predicate_timeout_ms.value)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "predicate_timeout_ms".to_string(),
            (self.predicate_timeout_ms.value.to_string(), self.predicate_timeout_ms.source),
        );
        map.insert(
            "trail_radius_km".to_string(),
            (self.trail_radius_km.value.to_string(), self.trail_radius_km.source),
        );
        map.insert(
            "poi_radius_km".to_string(),
            (self.poi_radius_km.value.to_string(), self.poi_radius_km.source),
        );
        map.insert(
            "audit_enabled".to_string(),
            (self.audit_enabled.value.to_string(), self.audit_enabled.source),
        );

        map
    }
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    predicate_timeout_ms: Option<u64>,
    trail_radius_km: Option<f64>,
    poi_radius_km: Option<f64>,
    audit_enabled: Option<bool>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub predicate_timeout_ms: Option<u64>,
    pub trail_radius_km: Option<f64>,
    pub poi_radius_km: Option<f64>,
    pub audit_enabled: Option<bool>,
}

fn validate_timeout(timeout_ms: u64) -> Result<u64> {
    if timeout_ms == 0 {
        return Err(TrailscopeError::ConfigInvalid {
            key: "predicate_timeout_ms".to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }
    Ok(timeout_ms)
}

fn validate_radius(key: &str, radius_km: f64) -> Result<f64> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(TrailscopeError::ConfigInvalid {
            key: key.to_string(),
            reason: format!("radius must be a positive number of kilometers, got {}", radius_km),
        });
    }
    Ok(radius_km)
}

/// Parse a radius in kilometers from a string
pub fn parse_radius(key: &str, s: &str) -> Result<f64> {
    let radius = s.trim().parse::<f64>().map_err(|e| TrailscopeError::ConfigInvalid {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    validate_radius(key, radius)
}

/// Parse a boolean flag from a string
pub fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(TrailscopeError::ConfigInvalid {
            key: "bool".to_string(),
            reason: format!("Invalid boolean: {}. Use true or false", s),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert_eq!(config.predicate_timeout_ms.value, 5_000);
        assert_eq!(config.predicate_timeout_ms.source, ConfigSource::Default);
        assert_eq!(config.trail_radius_km.value, 50.0);
        assert_eq!(config.poi_radius_km.value, 5.0);
        assert!(config.audit_enabled.value);
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);

        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
predicate_timeout_ms = 750
trail_radius_km = 25.0
audit_enabled = false
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert_eq!(config.predicate_timeout_ms.value, 750);
        assert_eq!(config.predicate_timeout_ms.source, ConfigSource::File);
        assert_eq!(config.trail_radius_km.value, 25.0);
        assert!(!config.audit_enabled.value);
        assert_eq!(config.poi_radius_km.source, ConfigSource::Default);
    }

    #[test]
    fn test_file_rejects_zero_timeout() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "predicate_timeout_ms = 0").unwrap();

        let result = LayeredConfig::with_defaults().load_from_file(file.path());
        assert!(matches!(result, Err(TrailscopeError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();

        config.update_from_cli(CliConfigOverrides {
            poi_radius_km: Some(2.5),
            ..Default::default()
        });

        assert_eq!(config.poi_radius_km.value, 2.5);
        assert_eq!(config.poi_radius_km.source, ConfigSource::Cli);
        assert_eq!(config.trail_radius_km.source, ConfigSource::Default);
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_radius("r", "12.5").unwrap(), 12.5);
        assert!(parse_radius("r", "-1").is_err());
        assert!(parse_radius("r", "wide").is_err());
        assert!(parse_bool("YES").unwrap());
        assert!(!parse_bool("off").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        let (timeout, source) = &map["predicate_timeout_ms"];
        assert_eq!(timeout, "5000");
        assert_eq!(*source, ConfigSource::Default);
        assert!(map.contains_key("audit_enabled"));
    }
}
