//! Translation of [`SpatialFilter`] into PostGIS SQL.

use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::Postgres;
use trailscope_core::error::{Result, TrailscopeError};
use trailscope_core::models::{Geometry, SpatialFilter, SpatialPredicate};
use trailscope_geo::models::to_geo_geometry;
use wkt::ToWkt;

/// A WHERE fragment plus the values it expects to be bound, in order
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialClause {
    pub sql: String,
    pub geometry_wkt: Option<String>,
    pub distance_m: Option<f64>,
}

/// Build the predicate for `column`, numbering parameters from `first_param`.
///
/// A filter without geometry yields `TRUE` and binds nothing. Bounding-box
/// tests use containment in the filter envelope, edges included.
pub fn spatial_clause(
    column: &str,
    filter: &SpatialFilter,
    first_param: usize,
) -> Result<SpatialClause> {
    let Some(geometry) = &filter.geometry else {
        if filter.predicate == SpatialPredicate::DWithin {
            return Err(TrailscopeError::invalid_geometry(
                "distance query requires both geometry and distance",
            ));
        }
        return Ok(SpatialClause { sql: "TRUE".to_string(), geometry_wkt: None, distance_m: None });
    };

    let geom = format!("ST_GeomFromText(${}, 4326)", first_param);
    let wkt = Some(to_wkt(geometry));

    let clause = match filter.predicate {
        SpatialPredicate::Within => SpatialClause {
            sql: format!("ST_Within({}, {})", column, geom),
            geometry_wkt: wkt,
            distance_m: None,
        },
        SpatialPredicate::Intersects => SpatialClause {
            sql: format!("ST_Intersects({}, {})", column, geom),
            geometry_wkt: wkt,
            distance_m: None,
        },
        SpatialPredicate::BoundingBox => SpatialClause {
            sql: format!("ST_Covers(ST_Envelope({}), {})", geom, column),
            geometry_wkt: wkt,
            distance_m: None,
        },
        SpatialPredicate::DWithin => {
            let distance = filter.distance.ok_or_else(|| {
                TrailscopeError::invalid_geometry(
                    "distance query requires both geometry and distance",
                )
            })?;
            SpatialClause {
                sql: format!(
                    "ST_DWithin({}::geography, {}::geography, ${})",
                    column,
                    geom,
                    first_param + 1
                ),
                geometry_wkt: wkt,
                distance_m: Some(distance.to_meters()),
            }
        }
    };

    Ok(clause)
}

/// Bind the clause's values onto a query, in parameter order
pub fn bind_clause<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    clause: &SpatialClause,
) -> Query<'q, Postgres, PgArguments> {
    if let Some(wkt) = &clause.geometry_wkt {
        query = query.bind(wkt.clone());
    }
    if let Some(distance) = clause.distance_m {
        query = query.bind(distance);
    }
    query
}

pub fn to_wkt(geometry: &Geometry) -> String {
    to_geo_geometry(geometry).wkt_string()
}

/// Parse the output of `ST_AsGeoJSON`
pub fn parse_geojson(text: &str) -> Result<Geometry> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    Geometry::from_geojson(&value).ok_or_else(|| {
        TrailscopeError::Serialization(format!(
            "Unsupported geometry returned by database: {}",
            value.get("type").and_then(|t| t.as_str()).unwrap_or("unknown")
        ))
    })
}
