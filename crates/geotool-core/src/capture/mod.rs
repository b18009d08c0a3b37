//! Capture pipeline: state machine, prompts, and the rendering boundary.

pub mod events;
pub mod machine;
pub mod prompt;
pub mod render;

pub use events::{CaptureEvent, PreviewShape};
pub use machine::{CaptureMachine, CaptureState, ClickOutcome, Prompt, Reply, Transition};
pub use prompt::{PresetAnswers, Prompter};
pub use render::{LayerHandle, MapSurface, Renderer};
