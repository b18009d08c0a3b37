use anyhow::Result;
use geotool_core::config::LayeredConfig;

use super::open_session;
use crate::output::{format_area, format_length, OutputWriter};

pub async fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let session = open_session(config).await;
    let stats = session.stats();

    if output.is_json() {
        return output.result(stats);
    }

    output.section("Captures");
    output.kv("Points", stats.point_count);
    output.kv("Lines", stats.line_count);
    output.kv("Polygons", stats.polygon_count);
    output.kv("Total length", format_length(stats.total_length));
    output.kv("Total area", format_area(stats.total_area));

    output.section("GPS");
    output.kv("Track samples", stats.track_samples);
    if let Some(duration) = session.store().track_duration() {
        output.kv("Track duration", format!("{} min", duration.num_minutes()));
    }
    Ok(())
}
