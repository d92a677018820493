//! Read-through caching of the directory collections.
//!
//! ## Cache Hierarchy
//!
//! ```text
//! GET /api/{entity} → CollectionCache → CacheBackend (local | redis) → Store
//! ```
//!
//! ## Graceful Degradation
//!
//! The cache is an accelerator only. If Redis is unconfigured or
//! unreachable the backend falls back to a local map (when
//! `cache.local_fallback` is set) or to no caching at all, and every request
//! goes to the store.

pub mod backend;
pub mod collection;

pub use backend::{CacheBackend, CacheStats, CachedEntry};
pub use collection::CollectionCache;
