use crate::measure::haversine_meters;
use crate::models::{to_geo_geometry, Geometry, GeometryExt, SpatialFilter, SpatialPredicate};
use geo::algorithm::contains::Contains;
use geo::algorithm::intersects::Intersects;

/// Evaluate if a geometry satisfies a spatial filter
pub fn evaluate_spatial_filter(geometry: &Geometry, filter: &SpatialFilter) -> bool {
    let filter_geom = match (filter.predicate, &filter.geometry) {
        // DWithin needs both a geometry and a distance; without them nothing matches
        (SpatialPredicate::DWithin, _) => return evaluate_dwithin(geometry, filter),
        (_, Some(g)) => g,
        // No filter geometry means no spatial constraint
        (_, None) => return true,
    };

    match filter.predicate {
        SpatialPredicate::Within => evaluate_within(geometry, filter_geom),
        SpatialPredicate::Intersects => evaluate_intersects(geometry, filter_geom),
        SpatialPredicate::BoundingBox => evaluate_bounding_box(geometry, filter_geom),
        SpatialPredicate::DWithin => evaluate_dwithin(geometry, filter),
    }
}

/// Check if geometry lies inside the filter geometry.
///
/// Points on the filter's boundary are not inside it.
fn evaluate_within(geometry: &Geometry, filter: &Geometry) -> bool {
    let geo_geom = to_geo_geometry(geometry);
    let filter_geom = to_geo_geometry(filter);

    filter_geom.contains(&geo_geom)
}

/// Check if geometry shares any location with the filter geometry
fn evaluate_intersects(geometry: &Geometry, filter: &Geometry) -> bool {
    let geo_geom = to_geo_geometry(geometry);
    let filter_geom = to_geo_geometry(filter);

    geo_geom.intersects(&filter_geom)
}

/// Check if geometry lies inside the rectangle spanned by the filter's extent.
///
/// Edges count as inside, the same as `ST_Covers` on an envelope.
fn evaluate_bounding_box(geometry: &Geometry, filter: &Geometry) -> bool {
    let (Some(outer), Some(inner)) = (filter.extent(), geometry.extent()) else {
        return false;
    };

    outer.contains(inner.min_lon, inner.min_lat) && outer.contains(inner.max_lon, inner.max_lat)
}

/// Calculate geodesic distance between two geometries in meters.
///
/// Point-to-point distances are exact haversine distances; other geometries
/// are measured between their centroids. Returns `None` when a centroid
/// cannot be computed (empty geometries).
pub fn geodesic_distance(geom1: &Geometry, geom2: &Geometry) -> Option<f64> {
    match (geom1, geom2) {
        (Geometry::Point { coordinates: a }, Geometry::Point { coordinates: b }) => {
            Some(haversine_meters(*a, *b))
        }
        _ => {
            let c1 = geom1.centroid_coords()?;
            let c2 = geom2.centroid_coords()?;
            Some(haversine_meters(c1, c2))
        }
    }
}

/// Evaluate DWithin predicate (distance within threshold)
fn evaluate_dwithin(geometry: &Geometry, filter: &SpatialFilter) -> bool {
    let (Some(filter_geom), Some(distance)) = (&filter.geometry, &filter.distance) else {
        return false;
    };

    match geodesic_distance(geometry, filter_geom) {
        Some(dist) => dist <= distance.to_meters(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Distance;

    fn square() -> Geometry {
        Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [10.0, 0.0],
            [10.0, 10.0],
            [0.0, 10.0],
            [0.0, 0.0],
        ]])
    }

    fn triangle() -> Geometry {
        Geometry::polygon(vec![vec![[0.0, 0.0], [10.0, 0.0], [0.0, 10.0], [0.0, 0.0]]])
    }

    #[test]
    fn test_point_within_polygon() {
        let filter = SpatialFilter::new(SpatialPredicate::Within).geometry(square());

        assert!(evaluate_spatial_filter(&Geometry::point(5.0, 5.0), &filter));
        assert!(!evaluate_spatial_filter(&Geometry::point(15.0, 15.0), &filter));
    }

    #[test]
    fn test_boundary_point_intersects_but_is_not_within() {
        let on_edge = Geometry::point(10.0, 5.0);

        let within = SpatialFilter::new(SpatialPredicate::Within).geometry(square());
        let intersects = SpatialFilter::new(SpatialPredicate::Intersects).geometry(square());

        assert!(!evaluate_spatial_filter(&on_edge, &within));
        assert!(evaluate_spatial_filter(&on_edge, &intersects));
    }

    #[test]
    fn test_bounding_box_is_wider_than_polygon() {
        // Inside the triangle's extent but outside the triangle itself
        let corner = Geometry::point(8.0, 8.0);

        let within = SpatialFilter::new(SpatialPredicate::Within).geometry(triangle());
        let bbox = SpatialFilter::new(SpatialPredicate::BoundingBox).geometry(triangle());

        assert!(!evaluate_spatial_filter(&corner, &within));
        assert!(evaluate_spatial_filter(&corner, &bbox));
        assert!(!evaluate_spatial_filter(&Geometry::point(11.0, 5.0), &bbox));
    }

    #[test]
    fn test_bounding_box_includes_edges() {
        let bbox = SpatialFilter::new(SpatialPredicate::BoundingBox).geometry(square());

        assert!(evaluate_spatial_filter(&Geometry::point(10.0, 5.0), &bbox));
        assert!(evaluate_spatial_filter(&Geometry::point(0.0, 0.0), &bbox));
        assert!(evaluate_spatial_filter(
            &Geometry::line_string(vec![[0.0, 0.0], [10.0, 10.0]]),
            &bbox
        ));
        assert!(!evaluate_spatial_filter(
            &Geometry::line_string(vec![[0.0, 0.0], [10.5, 10.0]]),
            &bbox
        ));
    }

    #[test]
    fn test_line_crossing_and_within() {
        let crossing = Geometry::line_string(vec![[-5.0, 5.0], [5.0, 5.0]]);
        let inside = Geometry::line_string(vec![[2.0, 2.0], [8.0, 8.0]]);

        let intersects = SpatialFilter::new(SpatialPredicate::Intersects).geometry(square());
        let within = SpatialFilter::new(SpatialPredicate::Within).geometry(square());

        assert!(evaluate_spatial_filter(&crossing, &intersects));
        assert!(!evaluate_spatial_filter(&crossing, &within));
        assert!(evaluate_spatial_filter(&inside, &within));
    }

    #[test]
    fn test_line_crossing_a_river() {
        let river = Geometry::line_string(vec![[0.0, -1.0], [0.0, 1.0]]);
        let trail = Geometry::line_string(vec![[-1.0, 0.0], [1.0, 0.0]]);
        let elsewhere = Geometry::line_string(vec![[3.0, 0.0], [4.0, 0.0]]);

        let filter = SpatialFilter::new(SpatialPredicate::Intersects).geometry(river);
        assert!(evaluate_spatial_filter(&trail, &filter));
        assert!(!evaluate_spatial_filter(&elsewhere, &filter));
    }

    #[test]
    fn test_dwithin_point_to_point() {
        // Killarney and a point roughly 1.1km east of it
        let center = Geometry::point(-9.507, 52.059);
        let nearby = Geometry::point(-9.491, 52.059);

        let within_2km = SpatialFilter::new(SpatialPredicate::DWithin)
            .geometry(center.clone())
            .distance(Distance::kilometers(2.0));
        let within_500m = SpatialFilter::new(SpatialPredicate::DWithin)
            .geometry(center)
            .distance(Distance::meters(500.0));

        assert!(evaluate_spatial_filter(&nearby, &within_2km));
        assert!(!evaluate_spatial_filter(&nearby, &within_500m));
    }

    #[test]
    fn test_dwithin_requires_distance_and_geometry() {
        let point = Geometry::point(0.0, 0.0);

        let no_distance =
            SpatialFilter::new(SpatialPredicate::DWithin).geometry(Geometry::point(0.0, 0.0));
        let no_geometry =
            SpatialFilter::new(SpatialPredicate::DWithin).distance(Distance::meters(1000.0));

        assert!(!evaluate_spatial_filter(&point, &no_distance));
        assert!(!evaluate_spatial_filter(&point, &no_geometry));
    }

    #[test]
    fn test_missing_filter_geometry_matches_everything() {
        let filter = SpatialFilter::new(SpatialPredicate::Within);
        assert!(evaluate_spatial_filter(&Geometry::point(170.0, -40.0), &filter));
    }

    #[test]
    fn test_geodesic_distance_accuracy() {
        // Dublin to Galway is roughly 187km
        let dublin = Geometry::point(-6.2603, 53.3498);
        let galway = Geometry::point(-9.0568, 53.2707);

        let distance = geodesic_distance(&dublin, &galway).expect("Should compute distance");
        assert!(
            distance > 182_000.0 && distance < 192_000.0,
            "Dublin-Galway distance {} should be ~187km",
            distance
        );
    }
}
