//! Reference layers on display.
//!
//! Loaded files are kept here with a visibility flag, separate from the
//! capture store. Nothing in this module is persisted.

use serde::Serialize;
use std::fmt;

use crate::formats::LoadedLayer;
use crate::models::Bounds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LayerId(pub u64);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReferenceLayer {
    pub id: LayerId,
    pub visible: bool,
    #[serde(flatten)]
    pub layer: LoadedLayer,
}

/// Loaded layers in the order they were added
#[derive(Debug, Default)]
pub struct ReferenceLayers {
    layers: Vec<ReferenceLayer>,
    last_id: u64,
}

impl ReferenceLayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer, visible; ids are never reused
    pub fn add(&mut self, layer: LoadedLayer) -> LayerId {
        self.last_id += 1;
        let id = LayerId(self.last_id);
        tracing::debug!(id = %id, layer = %layer.name, "Reference layer added");
        self.layers.push(ReferenceLayer {
            id,
            visible: true,
            layer,
        });
        id
    }

    /// No-op when absent
    pub fn remove(&mut self, id: LayerId) -> Option<ReferenceLayer> {
        let index = self.layers.iter().position(|l| l.id == id)?;
        Some(self.layers.remove(index))
    }

    pub fn get(&self, id: LayerId) -> Option<&ReferenceLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn list(&self) -> &[ReferenceLayer] {
        &self.layers
    }

    /// Returns the new visibility, `None` for an unknown id
    pub fn set_visible(&mut self, id: LayerId, visible: bool) -> Option<bool> {
        let layer = self.layers.iter_mut().find(|l| l.id == id)?;
        layer.visible = visible;
        Some(visible)
    }

    pub fn toggle(&mut self, id: LayerId) -> Option<bool> {
        let visible = !self.get(id)?.visible;
        self.set_visible(id, visible)
    }

    /// Extent to zoom to; `None` for unknown ids and layers without geometry
    pub fn bounds(&self, id: LayerId) -> Option<Bounds> {
        self.get(id)?.layer.bounds
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::FormatRegistry;

    fn layer(name: &str) -> LoadedLayer {
        FormatRegistry::default()
            .load_content(
                &format!("{}.geojson", name),
                r#"{"type":"Point","coordinates":[-104.65,24.02]}"#,
            )
            .unwrap()
    }

    #[test]
    fn test_add_remove_keeps_ids() {
        let mut layers = ReferenceLayers::new();
        let a = layers.add(layer("predios"));
        let b = layers.add(layer("caminos"));
        assert_eq!((a, b), (LayerId(1), LayerId(2)));

        assert_eq!(layers.remove(a).unwrap().layer.name, "predios");
        assert!(layers.remove(a).is_none());

        let c = layers.add(layer("arroyos"));
        assert_eq!(c, LayerId(3));
        let names: Vec<&str> = layers.list().iter().map(|l| l.layer.name.as_str()).collect();
        assert_eq!(names, vec!["caminos", "arroyos"]);
    }

    #[test]
    fn test_visibility() {
        let mut layers = ReferenceLayers::new();
        let id = layers.add(layer("predios"));
        assert!(layers.get(id).unwrap().visible);

        assert_eq!(layers.toggle(id), Some(false));
        assert_eq!(layers.toggle(id), Some(true));
        assert_eq!(layers.set_visible(id, false), Some(false));
        assert!(!layers.get(id).unwrap().visible);

        assert_eq!(layers.toggle(LayerId(99)), None);
    }

    #[test]
    fn test_bounds() {
        let mut layers = ReferenceLayers::new();
        let id = layers.add(layer("pozo"));
        let bounds = layers.bounds(id).unwrap();
        assert_eq!((bounds.south, bounds.west), (24.02, -104.65));
        assert!(layers.bounds(LayerId(7)).is_none());
    }

    #[test]
    fn test_serialized_layer_is_flat() {
        let mut layers = ReferenceLayers::new();
        let id = layers.add(layer("predios"));
        let json = serde_json::to_value(layers.get(id).unwrap()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["visible"], true);
        assert_eq!(json["name"], "predios");
        assert_eq!(json["features"]["type"], "FeatureCollection");
    }
}
