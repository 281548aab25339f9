//! Area, density and distance approximations in degree space.

use geo::algorithm::area::Area;
use geo::{Distance, Haversine, Point};
use trailscope_core::models::Ring;

use crate::models::to_geo_geometry;

/// Kilometres per degree used by the area approximation
pub const KM_PER_DEGREE: f64 = 111.32;

/// Planar area of a ring in square degrees
pub fn planar_area(ring: &Ring) -> f64 {
    if ring.len() < 4 {
        return 0.0;
    }
    to_geo_geometry(&ring.to_polygon()).unsigned_area()
}

/// Approximate area in km², scaling square degrees by a flat 111.32² factor.
///
/// Longitude shrinkage away from the equator is ignored, so the figure
/// overstates the true area at higher latitudes.
pub fn approx_area_km2(ring: &Ring) -> f64 {
    planar_area(ring) * KM_PER_DEGREE * KM_PER_DEGREE
}

/// People per km², zero when the area is not positive
pub fn population_density(total_population: u64, area_km2: f64) -> f64 {
    if area_km2 > 0.0 {
        total_population as f64 / area_km2
    } else {
        0.0
    }
}

/// Great-circle distance between two `[lon, lat]` positions in meters
pub fn haversine_meters(a: [f64; 2], b: [f64; 2]) -> f64 {
    Haversine.distance(Point::new(a[0], a[1]), Point::new(b[0], b[1]))
}

/// Great-circle distance between two `[lon, lat]` positions in kilometres
pub fn haversine_km(a: [f64; 2], b: [f64; 2]) -> f64 {
    haversine_meters(a, b) / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_square_area() {
        let ring = Ring::closed(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);

        assert!((planar_area(&ring) - 1.0).abs() < 1e-12);
        assert!((approx_area_km2(&ring) - 12_392.1424).abs() < 1e-6);
    }

    #[test]
    fn test_area_ignores_winding() {
        let ccw = Ring::closed(vec![[0.0, 0.0], [2.0, 0.0], [2.0, 1.0], [0.0, 1.0]]);
        let cw = Ring::closed(vec![[0.0, 0.0], [0.0, 1.0], [2.0, 1.0], [2.0, 0.0]]);

        assert_eq!(planar_area(&ccw), planar_area(&cw));
        assert!((planar_area(&cw) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_ring_has_zero_area() {
        let line = Ring::closed(vec![[0.0, 0.0], [1.0, 1.0]]);
        let collinear = Ring::closed(vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]);

        assert_eq!(approx_area_km2(&line), 0.0);
        assert_eq!(approx_area_km2(&collinear), 0.0);
    }

    #[test]
    fn test_density_guards_zero_area() {
        assert_eq!(population_density(1_000, 0.0), 0.0);
        assert_eq!(population_density(1_000, 4.0), 250.0);
        assert_eq!(population_density(0, 4.0), 0.0);
    }

    #[test]
    fn test_haversine_km() {
        // Cork to Limerick is about 87km in a straight line
        let cork = [-8.4756, 51.8985];
        let limerick = [-8.6267, 52.6638];

        let km = haversine_km(cork, limerick);
        assert!(km > 82.0 && km < 92.0, "Cork-Limerick distance {} should be ~86km", km);
    }
}
