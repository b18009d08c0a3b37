use std::sync::Arc;

use geotool_core::formats::FormatRegistry;
use geotool_core::layers::ReferenceLayers;
use geotool_core::FieldSession;
use geotool_offline::hooks::MemoryPendingQueue;
use geotool_offline::{Fetcher, OfflineController};
use tokio::sync::Mutex;

/// Shared server state.
///
/// The session is behind a mutex so map reactions run one at a time.
pub struct AppState {
    pub session: Mutex<FieldSession>,
    pub offline: Arc<OfflineController>,
    /// Used for requests the offline controller does not intercept
    pub fetcher: Arc<dyn Fetcher>,
    pub formats: FormatRegistry,
    pub layers: Mutex<ReferenceLayers>,
    /// Captures made through the API, waiting for a sync backend
    pub pending: Arc<MemoryPendingQueue>,
}

impl AppState {
    pub fn new(
        session: FieldSession,
        offline: Arc<OfflineController>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            session: Mutex::new(session),
            offline,
            fetcher,
            formats: FormatRegistry::with_builtin_readers(),
            layers: Mutex::new(ReferenceLayers::new()),
            pending: Arc::new(MemoryPendingQueue::new()),
        }
    }
}
