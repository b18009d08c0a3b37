//! GeoTool Core - capture models, geometry, state machine and store
//!
//! This crate holds the domain logic of the field-data collector and the port
//! traits that storage and UI adapters implement.

pub mod capture;
pub mod config;
pub mod error;
pub mod export;
pub mod formats;
pub mod geometry;
pub mod layers;
pub mod models;
pub mod ports;
pub mod session;
pub mod store;
pub mod utm;

pub use error::{GeotoolError, Result};
pub use session::FieldSession;
pub use store::{CaptureStats, CaptureStore, StoreSnapshot};
