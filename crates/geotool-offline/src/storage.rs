//! Named cache generations

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::request::RequestKey;
use crate::response::CachedResponse;

/// Storage of named caches, each mapping request keys to responses.
///
/// Cache names are reported in creation order, and lookups across all caches
/// search them in that order.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Create the cache if it does not exist yet
    async fn open(&self, cache: &str) -> Result<()>;

    /// Store a response, creating the cache if needed; same-key writes replace
    async fn put(&self, cache: &str, key: RequestKey, response: CachedResponse) -> Result<()>;

    /// Look a key up in one cache
    async fn lookup(&self, cache: &str, key: &RequestKey) -> Result<Option<CachedResponse>>;

    /// Look a key up in every cache, oldest first
    async fn lookup_any(&self, key: &RequestKey) -> Result<Option<CachedResponse>>;

    /// Cache names in creation order
    async fn names(&self) -> Result<Vec<String>>;

    /// Delete a cache, returning whether it existed
    async fn delete(&self, cache: &str) -> Result<bool>;

    async fn len(&self, cache: &str) -> Result<usize>;
}

type Generation = (String, HashMap<RequestKey, CachedResponse>);

/// In-process cache storage
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheStorage {
    generations: Arc<RwLock<Vec<Generation>>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, cache: &str) -> Result<()> {
        let mut generations = self.generations.write().await;
        if !generations.iter().any(|(name, _)| name == cache) {
            generations.push((cache.to_string(), HashMap::new()));
        }
        Ok(())
    }

    async fn put(&self, cache: &str, key: RequestKey, response: CachedResponse) -> Result<()> {
        let mut generations = self.generations.write().await;
        match generations.iter_mut().find(|(name, _)| name == cache) {
            Some((_, entries)) => {
                entries.insert(key, response);
            }
            None => {
                generations.push((cache.to_string(), HashMap::from([(key, response)])));
            }
        }
        Ok(())
    }

    async fn lookup(&self, cache: &str, key: &RequestKey) -> Result<Option<CachedResponse>> {
        let generations = self.generations.read().await;
        Ok(generations
            .iter()
            .find(|(name, _)| name == cache)
            .and_then(|(_, entries)| entries.get(key))
            .cloned())
    }

    async fn lookup_any(&self, key: &RequestKey) -> Result<Option<CachedResponse>> {
        let generations = self.generations.read().await;
        Ok(generations
            .iter()
            .find_map(|(_, entries)| entries.get(key))
            .cloned())
    }

    async fn names(&self) -> Result<Vec<String>> {
        let generations = self.generations.read().await;
        Ok(generations.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn delete(&self, cache: &str) -> Result<bool> {
        let mut generations = self.generations.write().await;
        let before = generations.len();
        generations.retain(|(name, _)| name != cache);
        Ok(generations.len() != before)
    }

    async fn len(&self, cache: &str) -> Result<usize> {
        let generations = self.generations.read().await;
        Ok(generations
            .iter()
            .find(|(name, _)| name == cache)
            .map_or(0, |(_, entries)| entries.len()))
    }
}
