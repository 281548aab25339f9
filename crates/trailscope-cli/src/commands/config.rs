//! Config command implementation

use crate::output::OutputWriter;
use crate::output_types::{ConfigOutput, ConfigRow};
use anyhow::Result;
use trailscope_core::config::LayeredConfig;

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mut settings: Vec<ConfigRow> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| ConfigRow { key, value, source })
        .collect();
    settings.sort_by(|a, b| a.key.cmp(&b.key));

    if output.is_json() {
        return output.result(&ConfigOutput { settings });
    }

    output.section("Query Configuration");
    output.table(settings);
    Ok(())
}
