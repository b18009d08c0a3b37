//! Terminal implementations of the capture ports

use anyhow::Result;
use async_trait::async_trait;
use console::style;
use dialoguer::{Confirm, Input};
use geotool_core::capture::{LayerHandle, MapSurface, PreviewShape, Prompter};
use geotool_core::geometry;
use geotool_core::models::{Bounds, Capture, CaptureKind, Coordinate};
use geotool_core::utm;

use crate::output::{format_area, format_length};

/// Asks capture questions on the terminal.
///
/// dialoguer blocks, so every prompt runs on the blocking pool. A failed or
/// interrupted prompt counts as a cancel.
pub struct DialoguerPrompter;

#[async_trait]
impl Prompter for DialoguerPrompter {
    async fn capture_name(&self, kind: CaptureKind) -> Option<String> {
        let prompt = match kind {
            CaptureKind::Point => "Point name (e.g. Pino 1, Encino 3)",
            CaptureKind::Line => "Line name (e.g. Brecha cortafuego)",
            CaptureKind::Polygon => "Polygon name (e.g. Rodal 12)",
        };
        ask_text(prompt).await
    }

    async fn point_description(&self) -> Option<String> {
        ask_text("Description (optional)").await
    }

    async fn confirm_finalize(&self, kind: CaptureKind, vertex_count: usize) -> bool {
        let prompt = format!("{} vertices placed. Finish the {}?", vertex_count, kind);
        tokio::task::spawn_blocking(move || {
            Confirm::new().with_prompt(prompt).default(false).interact()
        })
        .await
        .ok()
        .and_then(|answer| answer.ok())
        .unwrap_or(false)
    }
}

async fn ask_text(prompt: &str) -> Option<String> {
    let prompt = prompt.to_string();
    tokio::task::spawn_blocking(move || {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
    })
    .await
    .ok()
    .and_then(|answer| answer.ok())
}

/// Read one command line from the user
pub async fn read_command(prompt: String) -> Result<String> {
    let line = tokio::task::spawn_blocking(move || {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
    })
    .await??;
    Ok(line)
}

/// Map surface that narrates drawing calls on the terminal
#[derive(Debug, Default)]
pub struct TerminalMap {
    next_layer: u64,
    vertex_count: usize,
}

impl MapSurface for TerminalMap {
    fn draw_vertex_marker(&mut self, kind: CaptureKind, coordinate: Coordinate) {
        self.vertex_count += 1;
        println!(
            "  {} {} vertex {} at {:.6}, {:.6}",
            style("•").cyan(),
            kind,
            self.vertex_count,
            coordinate.lat,
            coordinate.lon
        );
    }

    fn draw_preview(&mut self, preview: &PreviewShape) {
        let summary = match preview {
            PreviewShape::Path(vertices) => format_length(geometry::distance(vertices)),
            PreviewShape::Ring(vertices) => format_area(geometry::area(vertices)),
        };
        println!("  {} preview {}", style("~").dim(), style(summary).dim());
    }

    fn clear_ephemeral(&mut self) {
        self.vertex_count = 0;
    }

    fn add_capture_layer(&mut self, capture: &Capture) -> LayerHandle {
        self.next_layer += 1;
        tracing::debug!(layer = self.next_layer, name = %capture.name(), "Layer added");
        LayerHandle(self.next_layer)
    }

    fn remove_layer(&mut self, handle: LayerHandle) {
        tracing::debug!(layer = handle.0, "Layer removed");
    }

    fn fit_to(&mut self, bounds: Bounds) {
        let center = bounds.center();
        println!(
            "  {} view centered on {:.6}, {:.6} ({})",
            style("⌖").cyan(),
            center.lat,
            center.lon,
            utm::readout(center)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotool_core::capture::{CaptureEvent, Renderer};
    use geotool_core::models::CaptureId;

    #[test]
    fn test_terminal_map_tracks_layers_and_vertices() {
        let mut renderer = Renderer::new(TerminalMap::default());
        let v = Coordinate::new(24.0, -104.6);
        renderer.apply(&[
            CaptureEvent::VertexAdded { kind: CaptureKind::Line, coordinate: v },
            CaptureEvent::VertexAdded { kind: CaptureKind::Line, coordinate: v },
        ]);
        assert_eq!(renderer.surface().vertex_count, 2);

        renderer.apply(&[CaptureEvent::EphemeralCleared]);
        assert_eq!(renderer.surface().vertex_count, 0);

        let capture = Capture::point("Pino", "", v).unwrap().with_id(CaptureId(1));
        renderer.apply(&[CaptureEvent::CaptureAdded { capture }]);
        assert_eq!(renderer.layer_for(CaptureId(1)), Some(LayerHandle(1)));
    }
}
