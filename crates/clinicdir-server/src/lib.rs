pub mod accessor;
pub mod admin;
pub mod cache;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod roster;
pub mod server;

pub use accessor::{DirectoryAccessor, Fetched};
pub use admin::{AdminState, admin_routes};
pub use cache::{CacheBackend, CachedEntry, CollectionCache};
pub use config::{
    AppConfig, CacheConfig, PostgresStorageConfig, RedisConfig, ServerConfig, StorageBackend,
    StorageConfig,
};
pub use observability::init_tracing;
pub use roster::RosterService;
pub use server::{AppState, ClinicdirServer, ServerBuilder, build_app, build_router};

use anyhow::Context;
use clinicdir_storage::DynStorage;

/// Opens the configured store.
///
/// A postgres store that cannot be reached is a startup failure.
pub async fn create_storage(config: &StorageConfig) -> anyhow::Result<DynStorage> {
    match config.backend {
        StorageBackend::Memory => {
            let storage: DynStorage =
                clinicdir_db_memory::create_storage(config.memory.seed_demo_data);
            tracing::info!(
                seed_demo_data = config.memory.seed_demo_data,
                "Using in-memory storage"
            );
            Ok(storage)
        }
        StorageBackend::Postgres => {
            let pg = config.postgres.to_postgres_config();
            tracing::info!(
                url = %clinicdir_db_postgres::mask_password(&pg.url),
                "Connecting to PostgreSQL"
            );
            let storage: DynStorage = clinicdir_db_postgres::create_storage(pg)
                .await
                .context("failed to open PostgreSQL storage")?;
            Ok(storage)
        }
    }
}

/// Create a cache backend based on configuration.
///
/// ## Cache Modes
///
/// - **Redis configured and reachable**: shared Redis cache
/// - **Otherwise, `cache.local_fallback`**: per-instance DashMap cache
/// - **Otherwise**: caching disabled, every read goes to the store
///
/// ## Graceful Degradation
///
/// Redis problems at startup are logged and never abort the server.
pub async fn create_cache_backend(redis: &RedisConfig, cache: &CacheConfig) -> CacheBackend {
    use std::time::Duration;

    let fallback = || {
        if cache.local_fallback {
            tracing::info!("Using local cache");
            CacheBackend::new_local()
        } else {
            tracing::info!("Collection cache disabled");
            CacheBackend::Disabled
        }
    };

    let url = match redis.connection_url() {
        None => {
            tracing::info!("Redis not configured");
            return fallback();
        }
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Invalid Redis configuration");
            return fallback();
        }
        Some(Ok(url)) => url,
    };

    tracing::info!(url = %clinicdir_db_postgres::mask_password(&url), "Connecting to Redis");

    let timeout = Some(Duration::from_millis(redis.timeout_ms));
    let mut redis_config = deadpool_redis::Config::from_url(url);
    let mut pool_config = deadpool_redis::PoolConfig::new(redis.pool_size);
    pool_config.timeouts.wait = timeout;
    pool_config.timeouts.create = timeout;
    pool_config.timeouts.recycle = timeout;
    redis_config.pool = Some(pool_config);

    let pool = match redis_config.create_pool(Some(deadpool_redis::Runtime::Tokio1)) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to create Redis pool");
            return fallback();
        }
    };

    match pool.get().await {
        Ok(_) => {
            tracing::info!("Connected to Redis");
            CacheBackend::new_redis(pool)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to connect to Redis");
            fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinicdir_storage::DirectoryStorage;

    #[tokio::test]
    async fn no_redis_url_disables_cache() {
        let backend = create_cache_backend(&RedisConfig::default(), &CacheConfig::default()).await;
        assert_eq!(backend.mode(), "disabled");
    }

    #[tokio::test]
    async fn no_redis_url_with_local_fallback() {
        let cache = CacheConfig {
            local_fallback: true,
            ..CacheConfig::default()
        };
        let backend = create_cache_backend(&RedisConfig::default(), &cache).await;
        assert_eq!(backend.mode(), "local");
    }

    #[tokio::test]
    async fn unreachable_redis_degrades() {
        let redis = RedisConfig {
            url: Some("redis://127.0.0.1:1".into()),
            timeout_ms: 200,
            ..RedisConfig::default()
        };
        let backend = create_cache_backend(&redis, &CacheConfig::default()).await;
        assert_eq!(backend.mode(), "disabled");
    }

    #[tokio::test]
    async fn memory_storage_opens() {
        let storage = create_storage(&AppConfig::in_memory(true).storage)
            .await
            .unwrap();
        assert_eq!(storage.backend_name(), "memory");
        assert!(!storage.list_doctors().await.unwrap().is_empty());
    }
}
