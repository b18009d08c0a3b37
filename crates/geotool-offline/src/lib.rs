//! GeoTool Offline - request interception and cache generations
//!
//! The [`OfflineController`] decides, per request, whether to answer from a
//! cache generation, from the network, or from a synthetic fallback. It talks
//! to the network through a [`Fetcher`] and to storage through a
//! [`CacheStorage`], so both can be swapped in tests.

pub mod config;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod hooks;
pub mod policy;
pub mod request;
pub mod response;
pub mod storage;

pub use config::OfflineConfig;
pub use controller::{Disposition, Lifecycle, OfflineController, ResponseSource};
pub use error::{OfflineError, Result};
pub use fetch::{Fetcher, ReqwestFetcher};
pub use policy::RequestClass;
pub use request::{Destination, RequestKey, ResourceRequest};
pub use response::CachedResponse;
pub use storage::{CacheStorage, MemoryCacheStorage};
