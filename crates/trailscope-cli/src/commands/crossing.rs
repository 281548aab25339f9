//! Boundary crossing command implementation

use crate::cli::CrossingArgs;
use crate::output::OutputWriter;
use crate::output_types::BoundaryTrailRow;
use anyhow::{bail, Context, Result};
use trailscope_api::dto::BoundaryTrailsResponse;
use trailscope_api::AppState;
use trailscope_core::models::{BoundaryCategory, BoundaryId};

pub async fn execute(args: &CrossingArgs, state: &AppState, output: &OutputWriter) -> Result<()> {
    let result = match (&args.id, &args.name, &args.category) {
        (Some(id), _, _) => state.boundaries.by_id(BoundaryId(*id)).await?,
        (None, Some(name), Some(category)) => {
            let category = category
                .parse::<BoundaryCategory>()
                .with_context(|| format!("Unknown boundary category '{}'", category))?;
            state.boundaries.by_name(name, category).await?
        }
        _ => bail!("Provide --id, or --name together with --category"),
    };

    if output.is_json() {
        return output.result(&BoundaryTrailsResponse::from(&result));
    }

    match &result.boundary {
        Some(boundary) => {
            output.section(format!("{} ({})", boundary.name, boundary.category));
        }
        None => {
            output.warning(format!(
                "No boundary named '{}'; matched trails by region label instead",
                args.name.as_deref().unwrap_or_default()
            ));
        }
    }

    output.kv("Crossing", result.crossing_count());
    output.table(result.crossing.iter().map(BoundaryTrailRow::from).collect());

    output.kv("Within", result.within_count());
    output.table(result.within.iter().map(BoundaryTrailRow::from).collect());

    Ok(())
}
