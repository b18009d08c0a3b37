//! Background sync and push notification hooks.
//!
//! There is no sync backend: the sync hook only reports what is pending and
//! leaves the queue untouched. Push payloads are turned into notification
//! descriptions for whatever shell displays them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{OfflineError, Result};

/// Tag that triggers capture synchronization
pub const SYNC_TAG: &str = "sync-captures";

pub const NOTIFICATION_ICON: &str = "/icon-192.png";
pub const NOTIFICATION_BADGE: &str = "/badge-72.png";

/// Records waiting to be sent upstream
#[async_trait]
pub trait PendingQueue: Send + Sync {
    async fn pending(&self) -> Result<Vec<Value>>;

    async fn clear(&self) -> Result<()>;
}

/// In-memory pending queue
#[derive(Debug, Clone, Default)]
pub struct MemoryPendingQueue {
    items: Arc<RwLock<Vec<Value>>>,
}

impl MemoryPendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, item: Value) {
        self.items.write().await.push(item);
    }

    /// Drop queued items the predicate rejects
    pub async fn retain(&self, keep: impl FnMut(&Value) -> bool) {
        self.items.write().await.retain(keep);
    }
}

#[async_trait]
impl PendingQueue for MemoryPendingQueue {
    async fn pending(&self) -> Result<Vec<Value>> {
        Ok(self.items.read().await.clone())
    }

    async fn clear(&self) -> Result<()> {
        self.items.write().await.clear();
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Tag is not one this hook handles
    Ignored,
    NothingPending,
    /// Records found; they stay queued until a backend exists
    Pending { count: usize },
    Failed,
}

/// React to a background-sync event
pub async fn handle_sync(tag: &str, queue: &dyn PendingQueue) -> SyncOutcome {
    if tag != SYNC_TAG {
        tracing::debug!(tag, "Ignoring sync event");
        return SyncOutcome::Ignored;
    }

    match queue.pending().await {
        Ok(items) if items.is_empty() => SyncOutcome::NothingPending,
        Ok(items) => {
            tracing::info!(count = items.len(), "Sync requested, records kept pending");
            SyncOutcome::Pending { count: items.len() }
        }
        Err(e) => {
            tracing::error!(error = %e, "Capture sync failed");
            SyncOutcome::Failed
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

/// A notification ready to display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    /// Vibration pattern in milliseconds
    pub vibrate: Vec<u32>,
    pub actions: Vec<NotificationAction>,
    /// The full push payload
    pub data: Value,
}

#[derive(Debug, Deserialize)]
struct PushPayload {
    title: String,
    #[serde(default)]
    body: String,
}

/// Turn a JSON push payload into a notification
pub fn parse_push(payload: &[u8]) -> Result<Notification> {
    let data: Value = serde_json::from_slice(payload)?;
    let push: PushPayload = serde_json::from_value(data.clone())
        .map_err(|e| OfflineError::InvalidPayload(e.to_string()))?;

    Ok(Notification {
        title: push.title,
        body: push.body,
        icon: NOTIFICATION_ICON.to_string(),
        badge: NOTIFICATION_BADGE.to_string(),
        vibrate: vec![200, 100, 200],
        actions: vec![
            NotificationAction {
                action: "open".to_string(),
                title: "Abrir".to_string(),
            },
            NotificationAction {
                action: "close".to_string(),
                title: "Cerrar".to_string(),
            },
        ],
        data,
    })
}

/// Page to open when a notification is clicked, if any
pub fn notification_click(action: Option<&str>) -> Option<&'static str> {
    match action {
        Some("open") => Some("/"),
        _ => None,
    }
}
