//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

pub mod persistence;

pub use persistence::Persistence;
