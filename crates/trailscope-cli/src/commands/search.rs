//! Polygon search command implementation

use crate::cli::SearchArgs;
use crate::output::OutputWriter;
use crate::output_types::CityRow;
use anyhow::Result;
use trailscope_api::dto::PolygonSearchRequest;
use trailscope_api::services::SearchService;
use trailscope_api::AppState;
use trailscope_core::models::MatchFilters;
use trailscope_query::AuditContext;

pub async fn execute(args: &SearchArgs, state: &AppState, output: &OutputWriter) -> Result<()> {
    let payload = super::read_payload(&args.payload)?;

    let filters = MatchFilters {
        min_population: args.min_population,
        countries: (!args.countries.is_empty()).then(|| args.countries.clone()),
    };

    let request = PolygonSearchRequest { polygon: Some(payload), filters: Some(filters) };
    let context = AuditContext { session_key: Some("cli".to_string()), client_ip: None };

    let response = SearchService::polygon_search(state, request, context)
        .await
        .map_err(super::to_anyhow)?;
    state.matcher.finish_audits().await;

    if output.is_json() {
        return output.result(&response);
    }

    let analysis = &response.results.analysis;

    output.section("Polygon Search");
    output.kv("Method", analysis.debug.used_method);
    output.kv(
        "Candidates",
        format!(
            "within {}, intersects {}, bbox {}",
            analysis.debug.within_count, analysis.debug.intersects_count, analysis.debug.bbox_count
        ),
    );
    output.kv("Cities", analysis.total_cities);
    output.kv("Total population", analysis.total_population);
    output.kv("Average population", analysis.average_population);
    output.kv("Area", format!("{:.2} km²", analysis.polygon_area_km2));
    output.kv("Density", format!("{:.2} per km²", analysis.population_density));
    output.kv("Time", format!("{} ms", analysis.execution_time_ms));

    output.section("Cities");
    output.table(response.results.cities.iter().map(CityRow::from).collect());

    Ok(())
}
