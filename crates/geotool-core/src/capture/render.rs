//! Rendering boundary.
//!
//! The core never draws anything itself. A [`MapSurface`] implementation
//! (a web map, a terminal printer, a test recorder) receives drawing calls
//! from a [`Renderer`], which subscribes to [`CaptureEvent`]s and keeps the
//! capture-to-layer mapping so the store stays free of rendering state.

use std::collections::HashMap;

use super::events::{CaptureEvent, PreviewShape};
use crate::formats::LoadedLayer;
use crate::models::{Bounds, Capture, CaptureId, CaptureKind, Coordinate};

/// Opaque handle to a layer drawn on a map surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerHandle(pub u64);

/// Drawing capability provided by the map collaborator
pub trait MapSurface {
    /// Mark a vertex of the shape being digitized
    fn draw_vertex_marker(&mut self, kind: CaptureKind, coordinate: Coordinate);

    /// Replace the live preview of the shape being digitized
    fn draw_preview(&mut self, preview: &PreviewShape);

    /// Remove vertex markers and the preview
    fn clear_ephemeral(&mut self);

    /// Draw a finalized capture as a persistent layer
    fn add_capture_layer(&mut self, capture: &Capture) -> LayerHandle;

    fn remove_layer(&mut self, handle: LayerHandle);

    fn fit_to(&mut self, bounds: Bounds);
}

/// Event subscriber translating capture events into surface calls
#[derive(Debug)]
pub struct Renderer<S> {
    surface: S,
    layers: HashMap<CaptureId, LayerHandle>,
}

impl<S: MapSurface> Renderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            layers: HashMap::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn layer_for(&self, id: CaptureId) -> Option<LayerHandle> {
        self.layers.get(&id).copied()
    }

    pub fn apply(&mut self, events: &[CaptureEvent]) {
        for event in events {
            self.apply_one(event);
        }
    }

    /// Draw captures loaded from persistence, which have no layers yet
    pub fn render_all(&mut self, captures: &[Capture]) {
        for capture in captures {
            self.add_layer(capture);
        }
    }

    /// Fit the view to a capture
    pub fn zoom_to(&mut self, capture: &Capture) {
        if let Some(bounds) = capture.bounds() {
            self.surface.fit_to(bounds);
        }
    }

    /// Fit the view to a loaded reference layer; layers without geometry
    /// leave the view alone
    pub fn zoom_to_layer(&mut self, layer: &LoadedLayer) -> bool {
        match layer.bounds {
            Some(bounds) => {
                self.surface.fit_to(bounds);
                true
            }
            None => false,
        }
    }

    fn apply_one(&mut self, event: &CaptureEvent) {
        match event {
            CaptureEvent::VertexAdded { kind, coordinate } => {
                self.surface.draw_vertex_marker(*kind, *coordinate)
            }
            CaptureEvent::PreviewUpdated { preview } => self.surface.draw_preview(preview),
            CaptureEvent::EphemeralCleared => self.surface.clear_ephemeral(),
            CaptureEvent::CaptureAdded { capture } => self.add_layer(capture),
            CaptureEvent::CaptureRemoved { id } => {
                if let Some(handle) = self.layers.remove(id) {
                    self.surface.remove_layer(handle);
                }
            }
            CaptureEvent::ToolSelected { .. }
            | CaptureEvent::ToolCleared
            | CaptureEvent::ShapeDiscarded { .. } => {}
        }
    }

    fn add_layer(&mut self, capture: &Capture) {
        let Some(id) = capture.id else {
            tracing::warn!(name = %capture.name(), "Skipping layer for capture without id");
            return;
        };
        let handle = self.surface.add_capture_layer(capture);
        if let Some(previous) = self.layers.insert(id, handle) {
            self.surface.remove_layer(previous);
        }
    }
}
