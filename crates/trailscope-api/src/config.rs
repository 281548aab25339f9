use std::env;
use std::path::PathBuf;

use trailscope_core::config::LayeredConfig;
use trailscope_core::error::Result;
use trailscope_store::memory::FixturePaths;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    pub database_url: Option<String>,

    /// TOML file layered over the query defaults
    pub config_path: Option<PathBuf>,

    /// GeoJSON files seeding the in-memory stores when no database is set
    pub fixtures: FixturePaths,
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let port = env::var("TRAILSCOPE_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3001);

        let cors_origin = env::var("TRAILSCOPE_CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());

        let fixtures = FixturePaths {
            cities: env_path("TRAILSCOPE_CITIES"),
            towns: env_path("TRAILSCOPE_TOWNS"),
            pois: env_path("TRAILSCOPE_POIS"),
            trails: env_path("TRAILSCOPE_TRAILS"),
            boundaries: env_path("TRAILSCOPE_BOUNDARIES"),
        };

        Self {
            port,
            cors_origin,
            database_url,
            config_path: env_path("TRAILSCOPE_CONFIG"),
            fixtures,
        }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Check if PostgreSQL storage is configured
    pub fn uses_postgres(&self) -> bool {
        self.database_url.is_some()
    }

    /// Query settings: defaults, then the TOML file, then environment
    pub fn query_config(&self) -> Result<LayeredConfig> {
        let mut config = LayeredConfig::with_defaults();
        if let Some(path) = &self.config_path {
            config = config.load_from_file(path)?;
        }
        Ok(config.load_from_env())
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var(key).ok().filter(|v| !v.trim().is_empty()).map(PathBuf::from)
}
