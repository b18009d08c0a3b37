//! GeoTool Store - persistence adapters
//!
//! Implementations of the core `Persistence` port: an in-memory adapter for
//! tests and short-lived sessions, and a JSON file adapter for the CLI and API.

pub mod file;
pub mod memory;

pub use file::JsonFilePersistence;
pub use memory::MemoryPersistence;
