use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::Row;
use trailscope_core::error::Result;
use trailscope_core::models::{BoundaryCategory, BoundaryEntity, BoundaryId};

use super::spatial::parse_geojson;
use super::{db_error, PostgresStore};
use crate::ports::BoundaryStore;

fn boundary_from_row(row: &PgRow) -> Result<BoundaryEntity> {
    let category: String = row.get("category");
    let geometry: String = row.get("geometry");

    Ok(BoundaryEntity {
        id: BoundaryId(row.get::<i64, _>("id") as u64),
        name: row.get("name"),
        category: category.parse()?,
        geometry: parse_geojson(&geometry)?,
    })
}

#[async_trait]
impl BoundaryStore for PostgresStore {
    async fn get_boundary(&self, id: BoundaryId) -> Result<Option<BoundaryEntity>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, category, ST_AsGeoJSON(geometry) AS geometry
            FROM boundaries
            WHERE id = $1
            "#,
        )
        .bind(id.0 as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to get boundary"))?;

        row.as_ref().map(boundary_from_row).transpose()
    }

    async fn find_boundary(
        &self,
        name: &str,
        category: BoundaryCategory,
    ) -> Result<Option<BoundaryEntity>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, category, ST_AsGeoJSON(geometry) AS geometry
            FROM boundaries
            WHERE category = $1 AND lower(name) = lower($2)
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(category.as_str())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find boundary"))?;

        row.as_ref().map(boundary_from_row).transpose()
    }
}
