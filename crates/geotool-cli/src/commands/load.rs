//! Load command: parse a reference layer and summarize it.
//!
//! Reference layers are display-only and never enter the capture store.

use anyhow::{Context, Result};
use geotool_core::capture::Renderer;
use geotool_core::formats::FormatRegistry;

use crate::cli::LoadArgs;
use crate::interactive::TerminalMap;
use crate::output::OutputWriter;
use crate::output_types::LayerOutput;

pub async fn execute(args: LoadArgs, output: &OutputWriter) -> Result<()> {
    let registry = FormatRegistry::with_builtin_readers();
    let layer = registry
        .load(&args.path)
        .await
        .with_context(|| format!("Failed to load {}", args.path.display()))?;

    if output.is_json() {
        return output.result(LayerOutput {
            feature_count: layer.feature_count(),
            name: layer.name,
            format: layer.format_name,
            bounds: layer.bounds,
        });
    }

    output.success(format!("Loaded {} ({})", layer.name, layer.format_name));
    output.kv("Features", layer.feature_count());

    let mut map = Renderer::new(TerminalMap::default());
    if !map.zoom_to_layer(&layer) {
        output.kv("Extent", "no geometry");
    }
    Ok(())
}
