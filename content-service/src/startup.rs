use crate::config::{ContentConfig, StorageBackend};
use crate::handlers;
use crate::services::fetcher::HttpFetcher;
use crate::services::{Storage, WebFetcher};
use crate::services::storage::{LocalStorage, S3Storage};
use aws_config::BehaviorVersion;
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use checker_core::cors::cors_layer;
use checker_core::error::AppError;
use checker_core::middleware::metrics::metrics_middleware;
use checker_core::middleware::tracing::request_id_middleware;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: ContentConfig,
    pub fetcher: Arc<dyn WebFetcher>,
    pub storage: Arc<dyn Storage>,
}

/// Wire the fetcher and the configured storage backend into shared state.
pub async fn build_state(config: &ContentConfig) -> Result<AppState, AppError> {
    let fetcher: Arc<dyn WebFetcher> = Arc::new(HttpFetcher::new(&config.fetch));

    let storage: Arc<dyn Storage> = match config.storage.backend {
        StorageBackend::Local => {
            let local = LocalStorage::new(&config.storage.local_path)
                .await
                .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))?;
            tracing::info!(path = %config.storage.local_path, "Using local storage");
            Arc::new(local)
        }
        StorageBackend::S3 => {
            let bucket = config.storage.s3_bucket.clone().ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!(
                    "S3_BUCKET_NAME must be set when STORAGE_BACKEND is s3"
                ))
            })?;
            let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
            let client = aws_sdk_s3::Client::new(&aws_config);
            tracing::info!(bucket = %bucket, "Using S3 storage");
            Arc::new(S3Storage::new(client, bucket))
        }
    };

    Ok(AppState {
        config: config.clone(),
        fetcher,
        storage,
    })
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.allowed_origin);

    Router::new()
        .route("/load-url", post(handlers::load_url))
        .route("/load-pdf", post(handlers::load_pdf))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(request_id_middleware))
        .layer(cors)
        .with_state(state)
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: ContentConfig) -> Result<Self, AppError> {
        let state = build_state(&config).await?;

        let app = build_router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
