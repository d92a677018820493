use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::get,
};
use clinicdir_auth::{AdminAuthService, AuthState};
use clinicdir_storage::DynStorage;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::{
    accessor::DirectoryAccessor,
    admin::{AdminState, admin_routes},
    cache::{CacheBackend, CollectionCache},
    config::AppConfig,
    handlers, middleware as app_middleware,
    roster::RosterService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: DynStorage,
    pub directory: DirectoryAccessor,
    pub roster: RosterService,
    pub accounts: AdminAuthService,
    pub auth: AuthState,
}

impl AppState {
    /// Wires the services around an already constructed store and cache.
    pub fn new(config: AppConfig, storage: DynStorage, cache: CacheBackend) -> Self {
        let collections = CollectionCache::new(cache, config.cache.clone());
        let directory = DirectoryAccessor::new(storage.clone(), collections);
        let roster = RosterService::new(directory.clone());
        let accounts = AdminAuthService::new(storage.clone(), config.auth.clone());
        let auth = AuthState::new(accounts.sessions());
        Self {
            config: Arc::new(config),
            storage,
            directory,
            roster,
            accounts,
            auth,
        }
    }

    /// Connects the configured store and cache.
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let storage = crate::create_storage(&config.storage).await?;
        let cache = crate::create_cache_backend(&config.redis, &config.cache).await;
        tracing::info!(
            storage = storage.backend_name(),
            cache = cache.mode(),
            "Directory services initialized"
        );
        Ok(Self::new(config, storage, cache))
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for AdminState {
    fn from_ref(state: &AppState) -> Self {
        AdminState {
            accounts: state.accounts.clone(),
            roster: state.roster.clone(),
            directory: state.directory.clone(),
            page_size: state.config.search.admin_page_size,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.body_limit_bytes;
    let timeout = state.config.request_timeout();
    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        // Search and collection endpoints
        .route("/api/search", get(handlers::search_doctors))
        .route(
            "/api/{entity}",
            get(handlers::list_collection).post(handlers::refresh_collection),
        )
        .nest("/api/admin", admin_routes::<AppState>())
        .with_state(state)
        // Middleware stack, outermost last: request id -> trace -> cors/compression -> timeout
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    let req_id = req
                        .extensions()
                        .get::<axum::http::HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = Empty,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(middleware::from_fn(app_middleware::request_id))
}

/// Builds the full application from configuration.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let state = AppState::from_config(cfg.clone()).await?;
    Ok(build_router(state))
}

pub struct ClinicdirServer {
    addr: SocketAddr,
    app: Router,
}

pub struct ServerBuilder {
    addr: Option<SocketAddr>,
    config: AppConfig,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            addr: None,
            config: AppConfig::default(),
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.config = cfg;
        self
    }

    pub async fn build(self) -> anyhow::Result<ClinicdirServer> {
        let addr = self.addr.unwrap_or_else(|| self.config.addr());
        let app = build_app(&self.config).await?;
        Ok(ClinicdirServer { addr, app })
    }
}

impl ClinicdirServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
