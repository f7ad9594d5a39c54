//! Roster API Server implementation
//!
//! HTTP stand-in for the template page: download the template, drop a file
//! for preview, inspect or reset the preview.

use std::net::SocketAddr;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::config::TemplateConfig;
use crate::preview::PreviewSession;

/// API Server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub version: String,
    pub template: TemplateConfig,
    preview: RwLock<PreviewSession>,
}

impl AppState {
    pub fn new(template: TemplateConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            template,
            preview: RwLock::new(PreviewSession::new()),
        }
    }

    pub fn preview(&self) -> RwLockReadGuard<'_, PreviewSession> {
        self.preview.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn preview_mut(&self) -> RwLockWriteGuard<'_, PreviewSession> {
        self.preview.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Build the router with all endpoints
pub fn build_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Template endpoints
        .route("/api/v1/template", get(handlers::download_template))
        .route("/api/v1/lookup", get(handlers::lookup))
        .route(
            "/api/v1/preview",
            post(handlers::upload_preview)
                .get(handlers::get_preview)
                .delete(handlers::reset_preview),
        )
        // Uploads are not size-limited
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig, template: TemplateConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_server=info,roster_template=info,tower_http=info".into()),
        )
        .init();

    template.validate()?;
    let app = build_router(Arc::new(AppState::new(template)));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("📋 Roster API Server starting on http://{}", addr);
    info!("   Endpoints: /api/v1/template, /api/v1/lookup, /api/v1/preview");
    info!("   Health: /health, Version: /version");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Roster API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PreviewRecord;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_config_address_format() {
        let config = ApiConfig {
            host: "192.168.1.100".to_string(),
            port: 9090,
        };
        let addr: SocketAddr = format!("{}:{}", config.host, config.port)
            .parse()
            .unwrap();
        assert_eq!(addr.port(), 9090);
    }

    #[test]
    fn test_app_state_starts_with_empty_preview() {
        let state = AppState::new(TemplateConfig::default());
        assert_eq!(state.version, env!("CARGO_PKG_VERSION"));
        assert!(state.preview().is_empty());
    }

    #[test]
    fn test_app_state_preview_mut() {
        let state = Arc::new(AppState::new(TemplateConfig::default()));
        let lookup = state.template.lookup.clone();
        state
            .preview_mut()
            .replace("a.xlsx", vec![PreviewRecord::new("A", "", "Male")], &lookup);
        assert_eq!(state.preview().rows().len(), 1);
    }
}
