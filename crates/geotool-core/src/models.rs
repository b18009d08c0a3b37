pub mod capture;
pub mod coordinate;
pub mod track;

pub use capture::{Capture, CaptureId, CaptureKind, CaptureShape, CaptureTool};
pub use coordinate::{Bounds, Coordinate};
pub use track::TrackSample;
