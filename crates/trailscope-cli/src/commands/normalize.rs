//! Normalize command implementation

use crate::cli::NormalizeArgs;
use crate::output::OutputWriter;
use crate::output_types::{NormalizeOutput, RingRow};
use anyhow::Result;
use trailscope_geo::measure::approx_area_km2;
use trailscope_geo::normalize_polygon;

pub fn execute(args: &NormalizeArgs, output: &OutputWriter) -> Result<()> {
    let payload = super::read_payload(&args.payload)?;
    let normalized = normalize_polygon(&payload)?;

    let result = NormalizeOutput {
        shape: normalized.shape,
        point_count: normalized.ring.len(),
        area_km2: approx_area_km2(&normalized.ring),
        ring: normalized.ring,
    };

    if output.is_json() {
        return output.result(&result);
    }

    output.section("Normalized Polygon");
    output.kv("Shape", format!("{:?}", result.shape));
    output.kv("Points", result.point_count);
    output.kv("Approx. area", format!("{:.2} km²", result.area_km2));

    output.table(
        result
            .ring
            .points()
            .iter()
            .enumerate()
            .map(|(index, [lon, lat])| RingRow { index, lon: *lon, lat: *lat })
            .collect(),
    );

    Ok(())
}
