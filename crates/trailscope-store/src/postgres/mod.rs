//! PostgreSQL/PostGIS storage adapter implementation

pub mod analysis;
pub mod boundary;
pub mod config;
pub mod entity;
pub mod migrations;
pub mod spatial;
pub mod trail;

pub use config::{ConfigError, MigrationConfig, PoolConfig, PostgresConfig};
pub use migrations::{MigrationError, MigrationManager, MigrationStatus};

use sqlx::{postgres::PgPoolOptions, PgPool};
use trailscope_core::error::{Result, TrailscopeError};

/// PostgreSQL storage adapter.
///
/// One value implements every storage port; clone it (the pool is shared)
/// to hand it to several owners.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresStore {
    /// Connect with the given configuration.
    ///
    /// Runs migrations first when `config.migrations.auto_run` is set.
    pub async fn new(config: PostgresConfig) -> Result<Self> {
        config.validate().map_err(|e| TrailscopeError::ConfigInvalid {
            key: "database_url".to_string(),
            reason: e.to_string(),
        })?;

        let pool = PgPoolOptions::new()
            .min_connections(config.pool.min_connections)
            .max_connections(config.pool.max_connections)
            .acquire_timeout(config.pool.acquire_timeout)
            .idle_timeout(config.pool.idle_timeout)
            .max_lifetime(config.pool.max_lifetime)
            .connect(&config.database_url)
            .await
            .map_err(db_error("Failed to connect to database"))?;

        let store = Self { pool, config };
        store.health_check().await?;

        if store.config.migrations.auto_run {
            store.run_migrations().await?;
        }

        tracing::info!(
            max_connections = store.config.pool.max_connections,
            "Connected to PostgreSQL"
        );

        Ok(store)
    }

    /// Connect and apply pending migrations regardless of configuration
    pub async fn with_migrations(config: PostgresConfig) -> Result<Self> {
        let store = Self::new(config).await?;
        store.run_migrations().await?;
        Ok(store)
    }

    pub async fn run_migrations(&self) -> Result<()> {
        MigrationManager::new(self.pool.clone())
            .run_migrations()
            .await
            .map_err(|e| TrailscopeError::Storage(format!("Migration failed: {}", e)))
    }

    pub async fn migration_status(&self) -> Result<Vec<MigrationStatus>> {
        MigrationManager::new(self.pool.clone()).check_status().await.map_err(|e| {
            TrailscopeError::Storage(format!("Failed to check migration status: {}", e))
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn config(&self) -> &PostgresConfig {
        &self.config
    }

    /// Perform a health check on the database connection
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_error("Health check failed"))?;
        Ok(())
    }
}

/// Wrap a sqlx error as a storage error with context
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> TrailscopeError {
    move |e| TrailscopeError::Storage(format!("{}: {}", context, e))
}
