//! Confirmation capability used by the capture state machine.

use async_trait::async_trait;

use crate::models::CaptureKind;

/// Asks the user for names and confirmations.
///
/// Every method may suspend (a dialog, a terminal prompt, a pending HTTP
/// answer). `None` or an empty string from the name prompts means the user
/// cancelled.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Required name for a new capture
    async fn capture_name(&self, kind: CaptureKind) -> Option<String>;

    /// Optional free-text description for a point
    async fn point_description(&self) -> Option<String>;

    /// Whether to finalize the shape now that it has `vertex_count` vertices
    async fn confirm_finalize(&self, kind: CaptureKind, vertex_count: usize) -> bool;
}

/// Prompter with fixed answers, for callers that collect them up front
#[derive(Debug, Clone, Default)]
pub struct PresetAnswers {
    pub name: Option<String>,
    pub description: Option<String>,
    pub finalize: bool,
}

impl PresetAnswers {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn finalizing(mut self) -> Self {
        self.finalize = true;
        self
    }
}

#[async_trait]
impl Prompter for PresetAnswers {
    async fn capture_name(&self, _kind: CaptureKind) -> Option<String> {
        self.name.clone()
    }

    async fn point_description(&self) -> Option<String> {
        self.description.clone()
    }

    async fn confirm_finalize(&self, _kind: CaptureKind, _vertex_count: usize) -> bool {
        self.finalize
    }
}
