//! Field session: the capture machine, the store and persistence wired together.

use std::sync::Arc;

use crate::capture::{CaptureEvent, CaptureMachine, CaptureState, ClickOutcome, Prompter};
use crate::models::{Capture, CaptureId, CaptureTool, Coordinate, TrackSample};
use crate::ports::Persistence;
use crate::store::{CaptureStats, CaptureStore};

/// One user's working session.
///
/// Every mutation is followed by a best-effort save. Persistence errors are
/// logged and never reach the caller.
pub struct FieldSession {
    machine: CaptureMachine,
    store: CaptureStore,
    persistence: Arc<dyn Persistence>,
}

impl FieldSession {
    /// Open a session, restoring whatever the persistence layer holds
    pub async fn open(persistence: Arc<dyn Persistence>) -> Self {
        let store = match persistence.load().await {
            Ok(Some(snapshot)) => {
                let store = CaptureStore::from_snapshot(snapshot);
                tracing::info!(
                    captures = store.len(),
                    track_samples = store.track().len(),
                    "Restored saved session"
                );
                store
            }
            Ok(None) => CaptureStore::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not load saved session, starting empty");
                CaptureStore::new()
            }
        };

        Self {
            machine: CaptureMachine::new(),
            store,
            persistence,
        }
    }

    pub fn state(&self) -> &CaptureState {
        self.machine.state()
    }

    pub fn store(&self) -> &CaptureStore {
        &self.store
    }

    pub fn captures(&self) -> &[Capture] {
        self.store.list()
    }

    pub fn stats(&self) -> CaptureStats {
        self.store.aggregate()
    }

    pub fn select_tool(&mut self, tool: CaptureTool) -> Vec<CaptureEvent> {
        self.machine.select_tool(tool)
    }

    pub fn deselect(&mut self) -> Vec<CaptureEvent> {
        self.machine.deselect()
    }

    /// Feed a map click through the machine and store whatever it finalizes
    pub async fn click(&mut self, coordinate: Coordinate, prompter: &dyn Prompter) -> ClickOutcome {
        let mut outcome = self.machine.click(coordinate, prompter).await;

        if let Some(capture) = outcome.capture.take() {
            match self.store.add(capture.clone()) {
                Ok(id) => {
                    let stored = capture.with_id(id);
                    tracing::info!(id = %id, kind = %stored.kind(), name = %stored.name(), "Capture added");
                    outcome.events.push(CaptureEvent::CaptureAdded {
                        capture: stored.clone(),
                    });
                    outcome.capture = Some(stored);
                    self.save().await;
                }
                Err(e) => tracing::error!(error = %e, "Failed to store capture"),
            }
        }

        outcome
    }

    /// Remove a capture; unknown ids produce no events
    pub async fn remove_capture(&mut self, id: CaptureId) -> Vec<CaptureEvent> {
        match self.store.remove(id) {
            Some(removed) => {
                tracing::info!(id = %id, name = %removed.name(), "Capture removed");
                self.save().await;
                vec![CaptureEvent::CaptureRemoved { id }]
            }
            None => {
                tracing::debug!(id = %id, "Remove ignored, no such capture");
                Vec::new()
            }
        }
    }

    /// Append a GPS fix to the track log
    pub async fn record_position(&mut self, sample: TrackSample) {
        self.store.append_track_sample(sample);
        self.save().await;
    }

    /// Drop everything, including the persisted copy
    pub async fn clear_all(&mut self) -> Vec<CaptureEvent> {
        let mut events = self.machine.deselect();
        events.extend(
            self.store
                .list()
                .iter()
                .filter_map(|c| c.id)
                .map(|id| CaptureEvent::CaptureRemoved { id }),
        );
        self.store.clear();

        if let Err(e) = self.persistence.clear().await {
            tracing::warn!(error = %e, "Failed to clear saved session");
        }
        events
    }

    async fn save(&self) {
        if let Err(e) = self.persistence.save(&self.store.snapshot()).await {
            tracing::warn!(error = %e, "Failed to save session, continuing unsynced");
        }
    }
}
