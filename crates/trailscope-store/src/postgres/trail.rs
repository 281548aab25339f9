use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::Row;
use trailscope_core::error::Result;
use trailscope_core::models::{SpatialFilter, Trail, TrailId, TrailStatistics};

use super::spatial::{bind_clause, parse_geojson, spatial_clause};
use super::{db_error, PostgresStore};
use crate::ports::TrailStore;

const TRAIL_COLUMNS: &str = r#"
    id, name, region, difficulty, length_km,
    ST_X(start_point) AS start_lon, ST_Y(start_point) AS start_lat,
    ST_AsGeoJSON(path) AS path
"#;

fn trail_from_row(row: &PgRow) -> Result<Trail> {
    let start_lon: Option<f64> = row.get("start_lon");
    let start_lat: Option<f64> = row.get("start_lat");
    let path: Option<String> = row.get("path");

    Ok(Trail {
        id: TrailId(row.get::<i64, _>("id") as u64),
        name: row.get("name"),
        region: row.get("region"),
        difficulty: row.get("difficulty"),
        length_km: row.get("length_km"),
        start_point: start_lon.zip(start_lat).map(|(lon, lat)| [lon, lat]),
        path: path.as_deref().map(parse_geojson).transpose()?,
    })
}

impl PostgresStore {
    async fn query_trails(&self, column: &str, filter: &SpatialFilter) -> Result<Vec<Trail>> {
        let clause = spatial_clause(column, filter, 1)?;
        let sql = format!(
            "SELECT {} FROM trails WHERE {} IS NOT NULL AND {} ORDER BY id",
            TRAIL_COLUMNS, column, clause.sql
        );

        let rows = bind_clause(sqlx::query(&sql), &clause)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to query trails"))?;

        rows.iter().map(trail_from_row).collect()
    }
}

#[async_trait]
impl TrailStore for PostgresStore {
    async fn trails_by_start(&self, filter: &SpatialFilter) -> Result<Vec<Trail>> {
        self.query_trails("start_point", filter).await
    }

    async fn trails_by_path(&self, filter: &SpatialFilter) -> Result<Vec<Trail>> {
        self.query_trails("path", filter).await
    }

    async fn trails_by_region(&self, label: &str) -> Result<Vec<Trail>> {
        let sql = format!(
            "SELECT {} FROM trails WHERE lower(trim(region)) = lower(trim($1)) ORDER BY id",
            TRAIL_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(label)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to query trails by region"))?;

        rows.iter().map(trail_from_row).collect()
    }

    async fn statistics(&self) -> Result<TrailStatistics> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_trails,
                COALESCE(AVG(length_km), 0) AS average_length_km,
                COUNT(*) FILTER (WHERE lower(trim(difficulty)) = 'easy') AS easy_count,
                COUNT(*) FILTER (WHERE lower(trim(difficulty)) = 'moderate') AS moderate_count,
                COUNT(*) FILTER (
                    WHERE lower(trim(difficulty)) IN ('hard', 'challenging')
                ) AS hard_count
            FROM trails
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to compute trail statistics"))?;

        Ok(TrailStatistics {
            total_trails: row.get::<i64, _>("total_trails") as usize,
            average_length_km: row.get("average_length_km"),
            easy_count: row.get::<i64, _>("easy_count") as usize,
            moderate_count: row.get::<i64, _>("moderate_count") as usize,
            hard_count: row.get::<i64, _>("hard_count") as usize,
        })
    }
}
