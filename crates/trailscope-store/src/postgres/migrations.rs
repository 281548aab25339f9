use sqlx::migrate::Migrator;
use sqlx::PgPool;
use std::collections::HashSet;
use thiserror::Error;

/// Schema embedded at compile time from `crates/trailscope-store/migrations`
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Migration failed: {0}")]
    Failed(#[from] sqlx::migrate::MigrateError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("PostGIS extension is not available in this database")]
    PostgisMissing,
}

/// One embedded migration and whether the database has applied it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub version: i64,
    pub description: String,
    pub applied: bool,
}

/// Applies and inspects the embedded schema migrations
pub struct MigrationManager {
    pool: PgPool,
}

impl MigrationManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply every pending migration in version order.
    ///
    /// Fails early with [`MigrationError::PostgisMissing`] when the server
    /// cannot provide PostGIS, since every table carries a geometry column.
    pub async fn run_migrations(&self) -> Result<(), MigrationError> {
        if !self.postgis_available().await? {
            return Err(MigrationError::PostgisMissing);
        }

        MIGRATOR.run(&self.pool).await?;
        tracing::info!(migrations = MIGRATOR.iter().count(), "Database schema up to date");
        Ok(())
    }

    /// Status of every embedded migration
    pub async fn check_status(&self) -> Result<Vec<MigrationStatus>, MigrationError> {
        let applied = self.applied_versions().await?;

        Ok(MIGRATOR
            .iter()
            .map(|migration| MigrationStatus {
                version: migration.version,
                description: migration.description.to_string(),
                applied: applied.contains(&migration.version),
            })
            .collect())
    }

    pub async fn has_pending_migrations(&self) -> Result<bool, MigrationError> {
        Ok(self.check_status().await?.iter().any(|s| !s.applied))
    }

    /// Highest applied migration version, `None` on a fresh database
    pub async fn current_version(&self) -> Result<Option<i64>, MigrationError> {
        Ok(self.applied_versions().await?.into_iter().max())
    }

    async fn applied_versions(&self) -> Result<HashSet<i64>, MigrationError> {
        // The bookkeeping table only exists after the first run
        let table_exists: bool =
            sqlx::query_scalar("SELECT to_regclass('public._sqlx_migrations') IS NOT NULL")
                .fetch_one(&self.pool)
                .await?;

        if !table_exists {
            return Ok(HashSet::new());
        }

        let versions: Vec<i64> =
            sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success")
                .fetch_all(&self.pool)
                .await?;

        Ok(versions.into_iter().collect())
    }

    async fn postgis_available(&self) -> Result<bool, MigrationError> {
        let available: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM pg_available_extensions WHERE name = 'postgis')",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(available)
    }
}
