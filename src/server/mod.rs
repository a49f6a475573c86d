use crate::cache::ExpiringCache;
use crate::config::{Config, CredentialStore, DebridConfig};
use crate::debrid::{Converter, RealDebridClient};
use crate::metadata::MetadataClient;
use crate::resolver::Resolver;
use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod routes_addon;
pub mod routes_config;

pub use error::ApiError;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Cached metadata client shared by every request
    pub metadata: Arc<MetadataClient>,
    /// Debrid credential storage
    pub credentials: Arc<CredentialStore>,
    /// Active converter; `None` when no credential is configured
    converter: Arc<RwLock<Option<Arc<dyn Converter>>>>,
}

impl AppContext {
    /// Build the context from config. `config_path` is where a development
    /// credential gets persisted.
    pub fn new(config: Config, config_path: PathBuf) -> Self {
        let metadata = Arc::new(MetadataClient::new(&config.metadata, ExpiringCache::new()));
        let credentials = Arc::new(CredentialStore::new(
            config.environment,
            config_path,
            config.debrid.credential().map(str::to_string),
        ));
        let converter = build_converter(&config.debrid, credentials.get());

        Self {
            config: Arc::new(config),
            metadata,
            credentials,
            converter: Arc::new(RwLock::new(converter)),
        }
    }

    /// A resolver over the current converter.
    pub fn resolver(&self) -> Resolver {
        Resolver::new(
            Arc::clone(&self.metadata),
            self.converter.read().clone(),
            self.config.cache_hints.hints(),
        )
        .with_page_size(self.config.metadata.page_size)
    }

    pub fn converter_enabled(&self) -> bool {
        self.converter.read().is_some()
    }

    /// Swap the active converter.
    pub fn set_converter(&self, converter: Option<Arc<dyn Converter>>) {
        *self.converter.write() = converter;
    }

    /// Store a new credential and rebuild the converter from it.
    pub fn set_credential(&self, api_key: Option<String>) -> Result<()> {
        self.credentials.set(api_key)?;
        self.set_converter(build_converter(&self.config.debrid, self.credentials.get()));
        Ok(())
    }

    /// A client for the current credential, for one-off provider calls.
    pub fn debrid_client(&self) -> Option<RealDebridClient> {
        self.credentials
            .get()
            .map(|key| RealDebridClient::new(&self.config.debrid, key))
    }
}

fn build_converter(config: &DebridConfig, api_key: Option<String>) -> Option<Arc<dyn Converter>> {
    match api_key {
        Some(key) => {
            tracing::info!("Debrid conversion enabled");
            Some(Arc::new(RealDebridClient::new(config, key)))
        }
        None => {
            tracing::info!("No debrid credential configured, serving raw sources only");
            None
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_check))
        .merge(routes_addon::addon_routes())
        .merge(routes_config::config_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Start the HTTP server
pub async fn start_server(config: Config, config_path: PathBuf) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let ctx = AppContext::new(config, config_path);
    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);
    tracing::info!("Addon manifest available at http://{}/manifest.json", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
