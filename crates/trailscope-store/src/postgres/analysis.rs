use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use trailscope_core::error::Result;
use trailscope_core::models::{AnalysisSummary, PolygonAnalysisRecord};

use super::spatial::{parse_geojson, to_wkt};
use super::{db_error, PostgresStore};
use crate::ports::AnalysisLog;

#[async_trait]
impl AnalysisLog for PostgresStore {
    async fn record(&self, record: &PolygonAnalysisRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO polygon_analyses (
                id, polygon_payload, polygon, entity_count, total_population,
                average_population, area_km2, duration_ms, session_key, client_ip, recorded_at
            )
            VALUES ($1, $2, ST_GeomFromText($3, 4326), $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(record.id)
        .bind(&record.polygon_payload)
        .bind(to_wkt(&record.polygon))
        .bind(record.entity_count as i32)
        .bind(record.total_population as i64)
        .bind(record.average_population)
        .bind(record.area_km2)
        .bind(record.duration_ms as i64)
        .bind(&record.session_key)
        .bind(&record.client_ip)
        .bind(record.recorded_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to record polygon analysis"))?;

        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<PolygonAnalysisRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, polygon_payload, ST_AsGeoJSON(polygon) AS polygon, entity_count,
                   total_population, average_population, area_km2, duration_ms,
                   session_key, client_ip, recorded_at
            FROM polygon_analyses
            ORDER BY recorded_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list polygon analyses"))?;

        rows.iter()
            .map(|row| {
                let polygon: String = row.get("polygon");
                Ok(PolygonAnalysisRecord {
                    id: row.get("id"),
                    polygon_payload: row.get("polygon_payload"),
                    polygon: parse_geojson(&polygon)?,
                    entity_count: row.get::<i32, _>("entity_count") as usize,
                    total_population: row.get::<i64, _>("total_population") as u64,
                    average_population: row.get("average_population"),
                    area_km2: row.get("area_km2"),
                    duration_ms: row.get::<i64, _>("duration_ms") as u64,
                    session_key: row.get("session_key"),
                    client_ip: row.get("client_ip"),
                    recorded_at: row.get("recorded_at"),
                })
            })
            .collect()
    }

    async fn summary(&self, since: DateTime<Utc>) -> Result<AnalysisSummary> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_analyses,
                COUNT(*) FILTER (WHERE recorded_at >= $1) AS analyses_since,
                COALESCE(AVG(entity_count)::DOUBLE PRECISION, 0) AS average_entity_count,
                COALESCE(AVG(duration_ms)::DOUBLE PRECISION, 0) AS average_duration_ms
            FROM polygon_analyses
            "#,
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to summarize polygon analyses"))?;

        Ok(AnalysisSummary {
            total_analyses: row.get::<i64, _>("total_analyses") as usize,
            analyses_since: row.get::<i64, _>("analyses_since") as usize,
            average_entity_count: row.get("average_entity_count"),
            average_duration_ms: row.get("average_duration_ms"),
        })
    }
}
