//! Digitizing state machine.
//!
//! [`CaptureState`] transitions are pure: each takes the current state plus
//! one input and returns the next state, the events to render, and at most
//! one question for the user. [`CaptureMachine`] drives those transitions and
//! awaits the answers through a [`Prompter`].

use serde::Serialize;

use super::events::{CaptureEvent, PreviewShape};
use super::prompt::Prompter;
use crate::models::{Capture, CaptureKind, CaptureTool, Coordinate};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CaptureState {
    #[default]
    Idle,
    ToolSelected {
        kind: CaptureKind,
    },
    Accumulating {
        kind: CaptureKind,
        vertices: Vec<Coordinate>,
    },
}

/// Question the machine needs answered before it can continue
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    /// Name (and optional description) for a point at `coordinate`
    PointDetails { coordinate: Coordinate },
    /// Finalize the in-progress shape now?
    ConfirmFinalize { kind: CaptureKind, vertex_count: usize },
    /// Name for the shape being finalized
    ShapeName { kind: CaptureKind },
}

/// The user's answer to a [`Prompt`]
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    PointDetails {
        name: Option<String>,
        description: Option<String>,
    },
    Confirm(bool),
    ShapeName(Option<String>),
}

/// Result of one pure transition
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: CaptureState,
    pub events: Vec<CaptureEvent>,
    pub prompt: Option<Prompt>,
    pub finalized: Option<Capture>,
}

impl Transition {
    fn to(state: CaptureState) -> Self {
        Self {
            state,
            events: Vec::new(),
            prompt: None,
            finalized: None,
        }
    }

    fn event(mut self, event: CaptureEvent) -> Self {
        self.events.push(event);
        self
    }

    fn ask(mut self, prompt: Prompt) -> Self {
        self.prompt = Some(prompt);
        self
    }
}

impl CaptureState {
    pub fn active_kind(&self) -> Option<CaptureKind> {
        match self {
            CaptureState::Idle => None,
            CaptureState::ToolSelected { kind } | CaptureState::Accumulating { kind, .. } => {
                Some(*kind)
            }
        }
    }

    pub fn vertices(&self) -> &[Coordinate] {
        match self {
            CaptureState::Accumulating { vertices, .. } => vertices,
            _ => &[],
        }
    }

    /// Activate a tool, discarding any shape in progress
    pub fn select(self, tool: CaptureTool) -> Transition {
        let kind = tool.kind();
        self.discard(CaptureState::ToolSelected { kind })
            .event(CaptureEvent::ToolSelected { kind })
    }

    /// Deactivate the current tool, discarding any shape in progress
    pub fn deselect(self) -> Transition {
        let was_active = self.active_kind().is_some();
        let transition = self.discard(CaptureState::Idle);
        if was_active {
            transition.event(CaptureEvent::ToolCleared)
        } else {
            transition
        }
    }

    /// React to a map click
    pub fn click(self, coordinate: Coordinate) -> Transition {
        match self {
            CaptureState::Idle => Transition::to(CaptureState::Idle),
            CaptureState::ToolSelected { kind: CaptureKind::Point } => {
                Transition::to(self).ask(Prompt::PointDetails { coordinate })
            }
            CaptureState::ToolSelected { kind } => append_vertex(kind, Vec::new(), coordinate),
            CaptureState::Accumulating { kind, vertices } => {
                append_vertex(kind, vertices, coordinate)
            }
        }
    }

    /// Continue after the user answered `prompt`
    pub fn resolve(self, prompt: Prompt, reply: Reply) -> Transition {
        match (prompt, reply) {
            (Prompt::PointDetails { coordinate }, Reply::PointDetails { name, description }) => {
                let capture = name.and_then(|name| {
                    Capture::point(name, description.unwrap_or_default(), coordinate).ok()
                });
                let mut transition = Transition::to(self);
                transition.finalized = capture;
                transition
            }
            (Prompt::ConfirmFinalize { kind, .. }, Reply::Confirm(true)) => {
                Transition::to(self).ask(Prompt::ShapeName { kind })
            }
            (Prompt::ConfirmFinalize { .. }, Reply::Confirm(false)) => Transition::to(self),
            (Prompt::ShapeName { .. }, Reply::ShapeName(name)) => self.finalize(name),
            (prompt, reply) => {
                tracing::warn!(?prompt, ?reply, "Reply does not answer the pending prompt");
                Transition::to(self)
            }
        }
    }

    /// Turn the accumulated vertices into a capture named `name`.
    ///
    /// A missing or blank name discards the shape and leaves the tool
    /// selected; a valid one yields the capture and deactivates the tool.
    pub fn finalize(self, name: Option<String>) -> Transition {
        let (kind, vertices) = match self {
            CaptureState::Accumulating { kind, vertices } => (kind, vertices),
            other => return Transition::to(other),
        };

        let vertex_count = vertices.len();
        let capture = name.and_then(|name| match kind {
            CaptureKind::Line => Capture::line(name, vertices).ok(),
            CaptureKind::Polygon => Capture::polygon(name, vertices).ok(),
            CaptureKind::Point => None,
        });

        match capture {
            Some(capture) => {
                let mut transition = Transition::to(CaptureState::Idle)
                    .event(CaptureEvent::EphemeralCleared)
                    .event(CaptureEvent::ToolCleared);
                transition.finalized = Some(capture);
                transition
            }
            None => Transition::to(CaptureState::ToolSelected { kind })
                .event(CaptureEvent::EphemeralCleared)
                .event(CaptureEvent::ShapeDiscarded { kind, vertex_count }),
        }
    }

    fn discard(self, next: CaptureState) -> Transition {
        match self {
            CaptureState::Accumulating { kind, vertices } => Transition::to(next)
                .event(CaptureEvent::EphemeralCleared)
                .event(CaptureEvent::ShapeDiscarded {
                    kind,
                    vertex_count: vertices.len(),
                }),
            _ => Transition::to(next),
        }
    }
}

fn append_vertex(
    kind: CaptureKind,
    mut vertices: Vec<Coordinate>,
    coordinate: Coordinate,
) -> Transition {
    vertices.push(coordinate);
    let count = vertices.len();
    let ready = count >= kind.min_vertices();

    let preview = ready.then(|| PreviewShape::for_kind(kind, &vertices));
    let mut transition = Transition::to(CaptureState::Accumulating { kind, vertices })
        .event(CaptureEvent::VertexAdded { kind, coordinate });

    if let Some(preview) = preview {
        transition = transition
            .event(CaptureEvent::PreviewUpdated { preview })
            .ask(Prompt::ConfirmFinalize {
                kind,
                vertex_count: count,
            });
    }
    transition
}

/// What a click produced
#[derive(Debug, Clone, Default)]
pub struct ClickOutcome {
    pub events: Vec<CaptureEvent>,
    pub capture: Option<Capture>,
}

/// Drives [`CaptureState`] transitions, awaiting prompts as they come up
#[derive(Debug, Default)]
pub struct CaptureMachine {
    state: CaptureState,
}

impl CaptureMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn select_tool(&mut self, tool: CaptureTool) -> Vec<CaptureEvent> {
        self.apply(|state| state.select(tool)).events
    }

    pub fn deselect(&mut self) -> Vec<CaptureEvent> {
        self.apply(CaptureState::deselect).events
    }

    /// Handle a map click, asking `prompter` whatever the transition needs
    pub async fn click(&mut self, coordinate: Coordinate, prompter: &dyn Prompter) -> ClickOutcome {
        let mut outcome = ClickOutcome::default();
        let mut transition = self.apply(|state| state.click(coordinate));

        loop {
            outcome.events.append(&mut transition.events);
            if transition.finalized.is_some() {
                outcome.capture = transition.finalized.take();
            }

            let Some(prompt) = transition.prompt.take() else {
                break;
            };
            let reply = ask(prompter, &prompt).await;
            transition = self.apply(|state| state.resolve(prompt, reply));
        }

        if let Some(capture) = &outcome.capture {
            tracing::debug!(kind = %capture.kind(), name = %capture.name(), "Shape finalized");
        }
        outcome
    }

    fn apply(&mut self, step: impl FnOnce(CaptureState) -> Transition) -> Transition {
        let mut transition = step(std::mem::take(&mut self.state));
        self.state = std::mem::take(&mut transition.state);
        transition
    }
}

async fn ask(prompter: &dyn Prompter, prompt: &Prompt) -> Reply {
    match prompt {
        Prompt::PointDetails { .. } => {
            let name = prompter.capture_name(CaptureKind::Point).await;
            let description = match &name {
                Some(name) if !name.trim().is_empty() => prompter.point_description().await,
                _ => None,
            };
            Reply::PointDetails { name, description }
        }
        Prompt::ConfirmFinalize { kind, vertex_count } => {
            Reply::Confirm(prompter.confirm_finalize(*kind, *vertex_count).await)
        }
        Prompt::ShapeName { kind } => Reply::ShapeName(prompter.capture_name(*kind).await),
    }
}
