//! Cache backend: disabled, local (DashMap) or shared (Redis).

use dashmap::DashMap;
use deadpool_redis::Pool;
use redis::AsyncCommands;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// A cached entry with TTL support.
///
/// The data is wrapped in `Arc` so hits hand out the payload without copying.
#[derive(Clone, Debug)]
pub struct CachedEntry {
    pub data: Arc<Vec<u8>>,
    pub cached_at: Instant,
    pub ttl: Duration,
}

impl CachedEntry {
    pub fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data: Arc::new(data),
            cached_at: Instant::now(),
            ttl,
        }
    }

    /// An entry written at `t0` is live strictly before `t0 + ttl`.
    pub fn is_expired(&self) -> bool {
        self.cached_at.elapsed() >= self.ttl
    }
}

/// Where collection snapshots are kept.
///
/// | Mode     | Reads                    | Writes                   |
/// |----------|--------------------------|--------------------------|
/// | Disabled | always absent            | no-op                    |
/// | Local    | per-instance DashMap     | per-instance DashMap     |
/// | Redis    | shared, `GET`            | shared, `SET EX`         |
///
/// Redis failures never surface to callers: a failed read is a miss and a
/// failed write is dropped, both logged at `warn`.
#[derive(Clone)]
pub enum CacheBackend {
    Disabled,
    Local(Arc<DashMap<String, CachedEntry>>),
    Redis(Pool),
}

impl CacheBackend {
    pub fn new_local() -> Self {
        CacheBackend::Local(Arc::new(DashMap::new()))
    }

    pub fn new_redis(redis_pool: Pool) -> Self {
        CacheBackend::Redis(redis_pool)
    }

    pub fn mode(&self) -> &'static str {
        match self {
            CacheBackend::Disabled => "disabled",
            CacheBackend::Local(_) => "local",
            CacheBackend::Redis(_) => "redis",
        }
    }

    pub async fn get(&self, key: &str) -> Option<Arc<Vec<u8>>> {
        match self {
            CacheBackend::Disabled => None,
            CacheBackend::Local(map) => {
                if let Some(entry) = map.get(key) {
                    if !entry.is_expired() {
                        tracing::debug!(key = %key, "cache hit (local)");
                        return Some(Arc::clone(&entry.data));
                    }
                    drop(entry);
                    map.remove(key);
                }
                tracing::debug!(key = %key, "cache miss");
                None
            }
            CacheBackend::Redis(pool) => match pool.get().await {
                Ok(mut conn) => match conn.get::<_, Option<Vec<u8>>>(key).await {
                    Ok(Some(data)) => {
                        tracing::debug!(key = %key, "cache hit (redis)");
                        Some(Arc::new(data))
                    }
                    Ok(None) => {
                        tracing::debug!(key = %key, "cache miss");
                        None
                    }
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "Redis GET error");
                        None
                    }
                },
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Failed to get Redis connection");
                    None
                }
            },
        }
    }

    /// Stores `value` under `key` for `ttl`, replacing any previous entry.
    pub async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        match self {
            CacheBackend::Disabled => {}
            CacheBackend::Local(map) => {
                map.insert(key.to_string(), CachedEntry::new(value, ttl));
                tracing::debug!(key = %key, ttl_secs = ttl.as_secs(), "cache set (local)");
            }
            CacheBackend::Redis(pool) => {
                let ttl_secs = ttl.as_secs().max(1);
                match pool.get().await {
                    Ok(mut conn) => {
                        if let Err(e) = conn.set_ex::<_, _, ()>(key, value, ttl_secs).await {
                            tracing::warn!(key = %key, error = %e, "Redis SET error");
                        } else {
                            tracing::debug!(key = %key, ttl_secs, "cache set (redis)");
                        }
                    }
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "Failed to get Redis connection");
                    }
                }
            }
        }
    }

    pub async fn invalidate(&self, key: &str) {
        match self {
            CacheBackend::Disabled => {}
            CacheBackend::Local(map) => {
                map.remove(key);
                tracing::debug!(key = %key, "cache invalidated (local)");
            }
            CacheBackend::Redis(pool) => match pool.get().await {
                Ok(mut conn) => {
                    if let Err(e) = conn.del::<_, ()>(key).await {
                        tracing::warn!(key = %key, error = %e, "Redis DEL error");
                    } else {
                        tracing::debug!(key = %key, "cache invalidated (redis)");
                    }
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Failed to get Redis connection");
                }
            },
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            mode: self.mode().to_string(),
            local_entries: match self {
                CacheBackend::Local(map) => map.len(),
                _ => 0,
            },
        }
    }

    /// Whether the shared cache answers (for readiness probes).
    pub async fn is_redis_available(&self) -> bool {
        match self {
            CacheBackend::Redis(pool) => match pool.get().await {
                Ok(mut conn) => {
                    let pong: redis::RedisResult<String> =
                        redis::cmd("PING").query_async(&mut conn).await;
                    pong.is_ok()
                }
                Err(_) => false,
            },
            _ => false,
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub mode: String,
    pub local_entries: usize,
}
