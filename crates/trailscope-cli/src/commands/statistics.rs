//! Trail statistics and search analytics command implementations

use crate::cli::AnalyticsArgs;
use crate::output::OutputWriter;
use crate::output_types::AnalysisRow;
use anyhow::Result;
use trailscope_api::dto::AnalyticsParams;
use trailscope_api::services::StatisticsService;
use trailscope_api::AppState;

use super::to_anyhow;

pub async fn trails(state: &AppState, output: &OutputWriter) -> Result<()> {
    let stats = StatisticsService::trail_statistics(state).await.map_err(to_anyhow)?;

    if output.is_json() {
        return output.result(&stats);
    }

    output.section("Trail Statistics");
    output.kv("Trails", stats.total_trails);
    output.kv("Average length", format!("{:.2} km", stats.average_length_km));
    output.kv("Easy", stats.easy_trails);
    output.kv("Moderate", stats.moderate_trails);
    output.kv("Hard", stats.hard_trails);
    Ok(())
}

pub async fn analytics(
    args: &AnalyticsArgs,
    state: &AppState,
    output: &OutputWriter,
) -> Result<()> {
    let params = AnalyticsParams { recent: Some(args.recent) };
    let report = StatisticsService::analytics(state, &params).await.map_err(to_anyhow)?;

    if output.is_json() {
        return output.result(&report);
    }

    output.section("Search Analytics");
    output.kv("Cities", report.total_cities);
    output.kv("Towns", report.total_towns);
    output.kv("Searches", report.total_analyses);
    output.kv(
        format!("Searches (last {} days)", report.recent_window_days),
        report.recent_analyses,
    );
    output.kv("Cities per search", format!("{:.1}", report.average_cities_per_search));
    output.kv("Average query time", format!("{:.1} ms", report.average_query_time_ms));

    if !report.latest.is_empty() {
        output.section("Latest Searches");
        output.table(report.latest.iter().map(AnalysisRow::from).collect());
    }
    Ok(())
}
