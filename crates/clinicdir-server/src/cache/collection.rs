//! Typed collection snapshots on top of `CacheBackend`.
//!
//! ## Cache Key Format
//!
//! `{entity}:all`, e.g. `doctors:all`, one key per collection with its own TTL.
//!
//! Payloads are MessagePack with named fields so optional members survive
//! the round trip.

use clinicdir_core::EntityKind;
use serde::{Serialize, de::DeserializeOwned};

use super::backend::{CacheBackend, CacheStats};
use crate::config::CacheConfig;

#[derive(Clone)]
pub struct CollectionCache {
    backend: CacheBackend,
    config: CacheConfig,
}

impl CollectionCache {
    pub fn new(backend: CacheBackend, config: CacheConfig) -> Self {
        Self { backend, config }
    }

    /// Returns the cached collection for `kind`, if present and decodable.
    ///
    /// A payload that fails to decode is dropped from the cache and reported
    /// as a miss.
    pub async fn get<T: DeserializeOwned>(&self, kind: EntityKind) -> Option<Vec<T>> {
        let key = kind.cache_key();
        let data = self.backend.get(key).await?;
        match rmp_serde::from_slice::<Vec<T>>(&data) {
            Ok(items) => Some(items),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to deserialize cached collection");
                self.backend.invalidate(key).await;
                None
            }
        }
    }

    /// Overwrites the snapshot for `kind` with a fresh TTL.
    pub async fn put<T: Serialize>(&self, kind: EntityKind, items: &[T]) {
        let key = kind.cache_key();
        match rmp_serde::to_vec_named(items) {
            Ok(data) => {
                self.backend.set(key, data, self.config.ttl(kind)).await;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to serialize collection for cache");
            }
        }
    }

    pub async fn invalidate(&self, kind: EntityKind) {
        self.backend.invalidate(kind.cache_key()).await;
    }

    pub fn backend(&self) -> &CacheBackend {
        &self.backend
    }

    pub fn stats(&self) -> CacheStats {
        self.backend.stats()
    }
}
