use async_trait::async_trait;

use crate::error::Result;
use crate::store::StoreSnapshot;

/// Port for durable storage of the capture store.
///
/// Callers treat failures as non-fatal: a failed load means "no prior data"
/// and a failed save leaves the session running unsynced.
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Write the full snapshot, replacing whatever was stored before
    async fn save(&self, snapshot: &StoreSnapshot) -> Result<()>;

    /// Read the stored snapshot, `None` when nothing has been saved yet
    async fn load(&self) -> Result<Option<StoreSnapshot>>;

    /// Delete the stored snapshot
    async fn clear(&self) -> Result<()>;
}
