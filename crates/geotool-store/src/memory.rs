//! In-memory persistence for development and testing.

use async_trait::async_trait;
use geotool_core::error::Result;
use geotool_core::ports::Persistence;
use geotool_core::StoreSnapshot;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keeps the last saved snapshot in memory.
///
/// Clones share the same slot, so a session reopened from a clone sees what
/// the previous one saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    slot: Arc<RwLock<Option<StoreSnapshot>>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `snapshot` already saved
    pub fn with_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(snapshot))),
        }
    }
}

#[async_trait]
impl Persistence for MemoryPersistence {
    async fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        *self.slot.write().await = Some(snapshot.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<StoreSnapshot>> {
        Ok(self.slot.read().await.clone())
    }

    async fn clear(&self) -> Result<()> {
        *self.slot.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotool_core::models::{Capture, Coordinate};

    #[tokio::test]
    async fn test_save_load_clear() {
        let persistence = MemoryPersistence::new();
        assert!(persistence.load().await.unwrap().is_none());

        let snapshot = StoreSnapshot {
            captures: vec![Capture::point("Pino", "", Coordinate::new(1.0, 2.0)).unwrap()],
            gps_track: vec![],
        };
        persistence.save(&snapshot).await.unwrap();
        assert_eq!(persistence.load().await.unwrap(), Some(snapshot));

        persistence.clear().await.unwrap();
        assert!(persistence.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let persistence = MemoryPersistence::new();
        let other = persistence.clone();

        persistence.save(&StoreSnapshot::default()).await.unwrap();
        assert!(other.load().await.unwrap().is_some());
    }
}
