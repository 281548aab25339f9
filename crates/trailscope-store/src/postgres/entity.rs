use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::Row;
use trailscope_core::error::Result;
use trailscope_core::models::{EntityId, EntityKind, LocatedEntity, SpatialFilter};

use super::spatial::{bind_clause, spatial_clause};
use super::{db_error, PostgresStore};
use crate::ports::EntityStore;

const ENTITY_COLUMNS: &str = r#"
    id, kind, name,
    ST_X(location) AS longitude, ST_Y(location) AS latitude,
    population, country, region, category, area_km2
"#;

fn entity_from_row(row: &PgRow) -> Result<LocatedEntity> {
    let kind: String = row.get("kind");

    Ok(LocatedEntity {
        id: EntityId(row.get::<i64, _>("id") as u64),
        kind: kind.parse()?,
        name: row.get("name"),
        location: [row.get("longitude"), row.get("latitude")],
        population: row.get::<Option<i64>, _>("population").map(|p| p.max(0) as u64),
        country: row.get("country"),
        region: row.get("region"),
        category: row.get("category"),
        area_km2: row.get("area_km2"),
    })
}

#[async_trait]
impl EntityStore for PostgresStore {
    async fn locate(&self, kind: EntityKind, filter: &SpatialFilter) -> Result<Vec<LocatedEntity>> {
        let clause = spatial_clause("location", filter, 2)?;
        let sql = format!(
            "SELECT {} FROM located_entities WHERE kind = $1 AND {} ORDER BY id",
            ENTITY_COLUMNS, clause.sql
        );

        let query = bind_clause(sqlx::query(&sql).bind(kind.as_str()), &clause);
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to execute spatial query"))?;

        rows.iter().map(entity_from_row).collect()
    }

    async fn nearest(
        &self,
        kind: EntityKind,
        point: [f64; 2],
        limit: usize,
    ) -> Result<Vec<LocatedEntity>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM located_entities
            WHERE kind = $1
            ORDER BY location <-> ST_SetSRID(ST_MakePoint($2, $3), 4326)
            LIMIT $4
            "#,
            ENTITY_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(kind.as_str())
            .bind(point[0])
            .bind(point[1])
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to execute nearest query"))?;

        rows.iter().map(entity_from_row).collect()
    }

    async fn count(&self, kind: EntityKind) -> Result<usize> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM located_entities WHERE kind = $1")
            .bind(kind.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count entities"))?;

        Ok(count as usize)
    }
}
