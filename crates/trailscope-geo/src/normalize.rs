//! Polygon payload normalization.
//!
//! Clients send polygons in several loosely-specified shapes. Every accepted
//! shape is reduced to one closed [`Ring`] of `[longitude, latitude]` pairs
//! in WGS 84 degrees:
//!
//! | shape                  | example                                           |
//! |------------------------|---------------------------------------------------|
//! | `PolygonCoordinates`   | `{"type": "Polygon", "coordinates": [[[x, y]]]}`  |
//! | `GeometryWrapper`      | `{"geometry": {"coordinates": [...]}}`            |
//! | `FeatureWrapper`       | `{"type": "Feature", "geometry": {...}}`          |
//! | `BareRing`             | `[[lon, lat], ...]` or `[[[lon, lat], ...]]`      |
//!
//! See [`PayloadShape`] for the variants.
//!
//! The coordinate container may itself be a single ring or a list of rings,
//! in which case the first (outer) ring is used.

use serde::Serialize;
use serde_json::{Map, Value};
use trailscope_core::error::{Result, TrailscopeError};
use trailscope_core::models::{Crs, Ring};

/// Which accepted payload shape a polygon arrived in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadShape {
    /// Mapping with a top-level `coordinates` key
    PolygonCoordinates,
    /// Mapping whose `geometry` mapping carries `coordinates`
    GeometryWrapper,
    /// GeoJSON Feature wrapping a geometry
    FeatureWrapper,
    /// The payload is the coordinate container itself
    BareRing,
}

/// A polygon payload after normalization
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPolygon {
    pub ring: Ring,
    pub shape: PayloadShape,
    pub crs: Crs,
}

/// Normalize any accepted polygon payload into a closed ring.
///
/// # Errors
///
/// - [`TrailscopeError::InvalidPayloadShape`] when the value matches none of the
///   accepted shapes
/// - [`TrailscopeError::EmptyCoordinates`] when the coordinate container is empty
/// - [`TrailscopeError::UnsupportedNesting`] when the container is neither a ring
///   nor a list of rings
pub fn normalize_polygon(payload: &Value) -> Result<NormalizedPolygon> {
    let (shape, container) = classify(payload)?;
    let points = resolve_ring(container)?;
    let ring = Ring::closed(points);

    tracing::debug!(shape = ?shape, points = ring.len(), "Normalized polygon payload");

    Ok(NormalizedPolygon { ring, shape, crs: Crs::wgs84() })
}

/// Locate the coordinate container, trying each shape in a fixed order.
fn classify(payload: &Value) -> Result<(PayloadShape, &Value)> {
    match payload {
        Value::Object(map) => classify_object(map),
        Value::Array(_) => Ok((PayloadShape::BareRing, payload)),
        other => Err(TrailscopeError::InvalidPayloadShape {
            reason: format!("expected an object or an array, got {}", json_kind(other)),
        }),
    }
}

fn classify_object(map: &Map<String, Value>) -> Result<(PayloadShape, &Value)> {
    if let Some(coordinates) = map.get("coordinates") {
        return Ok((PayloadShape::PolygonCoordinates, coordinates));
    }

    let geometry = map.get("geometry").and_then(Value::as_object);

    if let Some(coordinates) = geometry.and_then(|g| g.get("coordinates")) {
        // A Feature takes the same path; only the reported shape differs
        let shape = if is_feature(map) {
            PayloadShape::FeatureWrapper
        } else {
            PayloadShape::GeometryWrapper
        };
        return Ok((shape, coordinates));
    }

    if is_feature(map) && geometry.is_some() {
        return Err(TrailscopeError::InvalidPayloadShape {
            reason: "feature geometry has no coordinates".to_string(),
        });
    }

    Err(TrailscopeError::InvalidPayloadShape {
        reason: "object has neither 'coordinates' nor 'geometry.coordinates'".to_string(),
    })
}

fn is_feature(map: &Map<String, Value>) -> bool {
    map.get("type")
        .and_then(Value::as_str)
        .map(|t| t.eq_ignore_ascii_case("feature"))
        .unwrap_or(false)
}

/// Pick the ring out of the container and parse its coordinate pairs.
fn resolve_ring(container: &Value) -> Result<Vec<[f64; 2]>> {
    let items = match container {
        Value::Null => {
            return Err(TrailscopeError::InvalidPayloadShape {
                reason: "coordinates are null".to_string(),
            })
        }
        Value::Array(items) => items,
        other => {
            return Err(TrailscopeError::UnsupportedNesting {
                reason: format!("coordinates must be an array, got {}", json_kind(other)),
            })
        }
    };

    let first = items.first().ok_or(TrailscopeError::EmptyCoordinates)?;

    let ring = match first {
        Value::Array(inner) => match inner.first() {
            // [[[lon, lat], ...], ...] - list of rings, take the outer one
            Some(Value::Array(_)) => inner,
            // [[lon, lat], ...] - already a single ring
            Some(Value::Number(_)) => items,
            Some(other) => {
                return Err(TrailscopeError::UnsupportedNesting {
                    reason: format!("unexpected {} inside first coordinate", json_kind(other)),
                })
            }
            None => {
                return Err(TrailscopeError::UnsupportedNesting {
                    reason: "first coordinate is an empty array".to_string(),
                })
            }
        },
        other => {
            return Err(TrailscopeError::UnsupportedNesting {
                reason: format!("first element is {}, expected an array", json_kind(other)),
            })
        }
    };

    ring.iter().enumerate().map(|(idx, value)| parse_position(idx, value)).collect()
}

fn parse_position(idx: usize, value: &Value) -> Result<[f64; 2]> {
    let pair = value
        .as_array()
        .filter(|pair| pair.len() >= 2)
        .and_then(|pair| Some([pair[0].as_f64()?, pair[1].as_f64()?]));

    pair.ok_or_else(|| TrailscopeError::UnsupportedNesting {
        reason: format!("position {} is not a [longitude, latitude] pair", idx),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dublin_ring() -> Vec<[f64; 2]> {
        vec![[-6.3, 53.3], [-6.2, 53.3], [-6.2, 53.4], [-6.3, 53.4], [-6.3, 53.3]]
    }

    #[test]
    fn test_polygon_coordinates_shape() {
        let payload = json!({"type": "Polygon", "coordinates": [dublin_ring()]});
        let normalized = normalize_polygon(&payload).unwrap();

        assert_eq!(normalized.shape, PayloadShape::PolygonCoordinates);
        assert_eq!(normalized.ring.points(), dublin_ring().as_slice());
        assert_eq!(normalized.crs.epsg, 4326);
    }

    #[test]
    fn test_geometry_wrapper_shape() {
        let payload = json!({"geometry": {"type": "Polygon", "coordinates": [dublin_ring()]}});
        let normalized = normalize_polygon(&payload).unwrap();

        assert_eq!(normalized.shape, PayloadShape::GeometryWrapper);
        assert_eq!(normalized.ring.points(), dublin_ring().as_slice());
    }

    #[test]
    fn test_feature_wrapper_shape() {
        let payload = json!({
            "type": "FEATURE",
            "properties": {},
            "geometry": {"type": "Polygon", "coordinates": [dublin_ring()]}
        });
        let normalized = normalize_polygon(&payload).unwrap();

        assert_eq!(normalized.shape, PayloadShape::FeatureWrapper);
        assert_eq!(normalized.ring.points(), dublin_ring().as_slice());
    }

    #[test]
    fn test_bare_ring_and_bare_rings() {
        let flat = normalize_polygon(&json!(dublin_ring())).unwrap();
        let nested = normalize_polygon(&json!([dublin_ring()])).unwrap();

        assert_eq!(flat.shape, PayloadShape::BareRing);
        assert_eq!(flat.ring, nested.ring);
    }

    #[test]
    fn test_open_ring_is_closed() {
        let mut open = dublin_ring();
        open.pop();
        let normalized = normalize_polygon(&json!({"coordinates": [open]})).unwrap();

        assert_eq!(normalized.ring.points(), dublin_ring().as_slice());
    }

    #[test]
    fn test_first_ring_wins() {
        let hole = vec![[-6.26, 53.34], [-6.24, 53.34], [-6.24, 53.36], [-6.26, 53.34]];
        let payload = json!({"coordinates": [dublin_ring(), hole]});
        let normalized = normalize_polygon(&payload).unwrap();

        assert_eq!(normalized.ring.len(), 5);
    }

    #[test]
    fn test_third_coordinate_is_ignored() {
        let payload = json!([[0.0, 0.0, 12.0], [1.0, 0.0, 12.0], [1.0, 1.0, 15.0]]);
        let normalized = normalize_polygon(&payload).unwrap();

        assert_eq!(normalized.ring.points(), &[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);
    }

    #[test]
    fn test_empty_list_is_empty_coordinates() {
        let err = normalize_polygon(&json!([])).unwrap_err();
        assert!(matches!(err, TrailscopeError::EmptyCoordinates));

        let err = normalize_polygon(&json!({"coordinates": []})).unwrap_err();
        assert!(matches!(err, TrailscopeError::EmptyCoordinates));
    }

    #[test]
    fn test_unrecognized_payloads() {
        for payload in [
            json!("POLYGON((0 0, 1 0, 1 1, 0 0))"),
            json!(42),
            json!({"type": "Polygon"}),
            json!({"geometry": "Polygon"}),
            json!({"coordinates": null}),
        ] {
            let err = normalize_polygon(&payload).unwrap_err();
            assert!(
                matches!(err, TrailscopeError::InvalidPayloadShape { .. }),
                "payload {} gave {:?}",
                payload,
                err
            );
        }
    }

    #[test]
    fn test_feature_without_coordinates() {
        let payload = json!({"type": "Feature", "geometry": {"type": "Polygon"}});
        let err = normalize_polygon(&payload).unwrap_err();

        assert!(err.to_string().contains("feature geometry has no coordinates"));
    }

    #[test]
    fn test_malformed_nesting() {
        for payload in [
            json!(["a", "b"]),
            json!([[]]),
            json!([["x", 1.0]]),
            json!([[[0.0, 0.0], [1.0]]]),
            json!({"coordinates": "0,0 1,1"}),
        ] {
            let err = normalize_polygon(&payload).unwrap_err();
            assert!(
                matches!(err, TrailscopeError::UnsupportedNesting { .. }),
                "payload {} gave {:?}",
                payload,
                err
            );
        }
    }
}
