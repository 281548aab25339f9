//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;
use trailscope_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};

const ENV_KEYS: [&str; 4] = [
    "TRAILSCOPE_PREDICATE_TIMEOUT_MS",
    "TRAILSCOPE_TRAIL_RADIUS_KM",
    "TRAILSCOPE_POI_RADIUS_KM",
    "TRAILSCOPE_AUDIT_ENABLED",
];

fn clear_env() {
    for key in ENV_KEYS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_default_configuration() {
    clear_env();
    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.predicate_timeout_ms.value, 5_000);
    assert_eq!(config.predicate_timeout_ms.source, ConfigSource::Default);
    assert_eq!(config.trail_radius_km.value, 50.0);
    assert_eq!(config.poi_radius_km.value, 5.0);
    assert!(config.audit_enabled.value);
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    env::set_var("TRAILSCOPE_PREDICATE_TIMEOUT_MS", "1200");
    env::set_var("TRAILSCOPE_AUDIT_ENABLED", "false");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
predicate_timeout_ms = 300
trail_radius_km = 20.0
audit_enabled = true
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.predicate_timeout_ms.value, 1200);
    assert_eq!(config.predicate_timeout_ms.source, ConfigSource::Environment);
    assert!(!config.audit_enabled.value);
    assert_eq!(config.audit_enabled.source, ConfigSource::Environment);
    // Only present in the file
    assert_eq!(config.trail_radius_km.value, 20.0);
    assert_eq!(config.trail_radius_km.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();
    env::set_var("TRAILSCOPE_PREDICATE_TIMEOUT_MS", "0");
    env::set_var("TRAILSCOPE_POI_RADIUS_KM", "far");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.predicate_timeout_ms.value, 5_000);
    assert_eq!(config.predicate_timeout_ms.source, ConfigSource::Default);
    assert_eq!(config.poi_radius_km.value, 5.0);

    clear_env();
}

#[test]
#[serial]
fn test_configuration_precedence_order() {
    clear_env();
    env::set_var("TRAILSCOPE_TRAIL_RADIUS_KM", "30");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "trail_radius_km = 10.0").unwrap();

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.trail_radius_km.value, 30.0);
    assert_eq!(config.trail_radius_km.source, ConfigSource::Environment);

    config.update_from_cli(CliConfigOverrides {
        trail_radius_km: Some(5.0),
        ..Default::default()
    });

    assert_eq!(config.trail_radius_km.value, 5.0);
    assert_eq!(config.trail_radius_km.source, ConfigSource::Cli);

    assert!(ConfigSource::Cli.precedence() > ConfigSource::Environment.precedence());
    assert!(ConfigSource::Environment.precedence() > ConfigSource::File.precedence());
    assert!(ConfigSource::File.precedence() > ConfigSource::Default.precedence());

    clear_env();
}

#[test]
fn test_missing_file_is_config_error() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/trailscope.toml");
    assert!(result.is_err());
}

#[test]
fn test_malformed_toml_is_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "predicate_timeout_ms = \"soon\"").unwrap();

    let result = LayeredConfig::with_defaults().load_from_file(file.path());
    assert!(result.is_err());
}
