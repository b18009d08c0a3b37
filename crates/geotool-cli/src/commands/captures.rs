//! List, remove and clear captures

use anyhow::Result;
use dialoguer::Confirm;
use geotool_core::config::LayeredConfig;
use geotool_core::models::CaptureId;

use super::open_session;
use crate::cli::{ClearArgs, RemoveArgs};
use crate::errors::CommandError;
use crate::output::OutputWriter;
use crate::output_types::{CaptureRow, RemoveOutput};

pub async fn list(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let session = open_session(config).await;
    let captures = session.captures();

    let rows: Vec<CaptureRow> = captures.iter().map(CaptureRow::from).collect();
    output.table(rows, &captures)?;
    if !output.is_json() && !captures.is_empty() {
        output.info(format!("{} captures", captures.len()));
    }
    Ok(())
}

pub async fn remove(args: RemoveArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mut session = open_session(config).await;
    let removed = !session.remove_capture(CaptureId(args.id)).await.is_empty();

    if output.is_json() {
        return output.result(RemoveOutput { id: args.id, removed });
    }
    if removed {
        output.success(format!("Removed capture {}", args.id));
    } else {
        output.warning(format!("No capture with id {}", args.id));
    }
    Ok(())
}

pub async fn clear(args: ClearArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mut session = open_session(config).await;
    let count = session.captures().len();

    if !args.yes && output.is_json() {
        return Err(CommandError::ConfirmationRequired {
            action: "clear all captures".to_string(),
        }
        .into());
    }

    if !args.yes {
        let prompt = format!("Delete {} captures and the GPS track? This cannot be undone", count);
        let confirmed = tokio::task::spawn_blocking(move || {
            Confirm::new().with_prompt(prompt).default(false).interact()
        })
        .await??;
        if !confirmed {
            output.info("Nothing deleted");
            return Ok(());
        }
    }

    session.clear_all().await;
    output.success(format!("Deleted {} captures", count));
    Ok(())
}
