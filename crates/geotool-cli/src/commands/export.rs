//! Export command implementation

use anyhow::{Context, Result};
use geotool_core::config::LayeredConfig;
use geotool_core::export;
use std::path::PathBuf;

use super::open_session;
use crate::cli::ExportArgs;
use crate::output::OutputWriter;
use crate::output_types::ExportOutput;

pub async fn execute(args: ExportArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let session = open_session(config).await;
    let captures = session.captures();
    let document = export::export(captures, args.format)
        .with_context(|| format!("{} export failed", args.format))?;

    let path = args.output.unwrap_or_else(|| PathBuf::from(args.format.file_name()));
    if path.as_os_str() == "-" {
        print!("{}", document);
        return Ok(());
    }

    tokio::fs::write(&path, &document)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    if output.is_json() {
        output.result(ExportOutput {
            format: args.format.to_string(),
            path: path.display().to_string(),
            captures: captures.len(),
            bytes: document.len(),
        })
    } else {
        output.success(format!(
            "Exported {} captures to {} ({})",
            captures.len(),
            path.display(),
            args.format
        ));
        Ok(())
    }
}
