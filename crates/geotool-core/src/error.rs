//! Error types for GeoTool

use thiserror::Error;

use crate::models::{CaptureId, CaptureKind};

#[derive(Debug, Error)]
pub enum GeotoolError {
    // Capture errors
    #[error("Capture name must not be empty")]
    EmptyName,

    #[error("A {kind} needs at least {required} vertices, got {actual}")]
    TooFewVertices {
        kind: CaptureKind,
        required: usize,
        actual: usize,
    },

    #[error("Invalid coordinate ({lat}, {lon}): {reason}")]
    InvalidCoordinate { lat: f64, lon: f64, reason: String },

    #[error("Capture {0} already exists in the store")]
    DuplicateCapture(CaptureId),

    // Format errors
    #[error("Unsupported format '{extension}'. Use: {supported}")]
    UnsupportedFormat { extension: String, supported: String },

    #[error("Invalid {format} file: {reason}")]
    FormatValidation { format: String, reason: String },

    // Export errors
    #[error("No captures to export")]
    NothingToExport,

    #[error("Failed to write {format} export: {message}")]
    Export { format: String, message: String },

    // Persistence errors
    #[error("Persistence failure: {0}")]
    Persistence(String),

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for GeotoolError {
    fn from(err: serde_json::Error) -> Self {
        GeotoolError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeotoolError>;
