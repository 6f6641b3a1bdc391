use crate::config::EvaluationConfig;
use crate::handlers;
use crate::services::langfuse::{LangfuseClient, MockTraceSink};
use crate::services::prompt::EmbeddedPrompts;
use crate::services::providers::ModelProvider;
use crate::services::providers::bedrock::BedrockProvider;
use crate::services::providers::mock::MockModelProvider;
use crate::services::secrets::{HttpSecretsProvider, MockSecretsProvider};
use crate::services::{PromptRegistry, SecretsProvider, TraceSink};
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
    pub config: EvaluationConfig,
    pub secrets: Arc<dyn SecretsProvider>,
    pub prompts: Arc<dyn PromptRegistry>,
    pub traces: Arc<dyn TraceSink>,
    pub model: Arc<dyn ModelProvider>,
}

/// Select providers from the config flags. Disabled backends fall back to
/// mocks so the service can run without AWS or Langfuse access.
pub async fn build_state(config: &EvaluationConfig) -> Result<AppState, AppError> {
    let secrets: Arc<dyn SecretsProvider> = if config.secrets.enabled {
        Arc::new(HttpSecretsProvider::new(config.secrets.clone()))
    } else {
        tracing::info!("Secrets endpoint disabled, using mock provider");
        Arc::new(MockSecretsProvider::new(true))
    };

    let langfuse = Arc::new(LangfuseClient::new(config.langfuse.host.clone()));

    let prompts: Arc<dyn PromptRegistry> = if config.langfuse.registry_enabled {
        langfuse.clone()
    } else {
        tracing::info!("Prompt registry disabled, serving embedded templates");
        Arc::new(EmbeddedPrompts)
    };

    let traces: Arc<dyn TraceSink> = if config.langfuse.tracing_enabled {
        langfuse
    } else {
        tracing::info!("Trace export disabled, using mock sink");
        Arc::new(MockTraceSink::new(true))
    };

    let model: Arc<dyn ModelProvider> = if config.bedrock.enabled {
        let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let client = aws_sdk_bedrockruntime::Client::new(&aws_config);
        Arc::new(BedrockProvider::new(client, &config.bedrock))
    } else {
        tracing::info!("Bedrock disabled, using mock model provider");
        Arc::new(MockModelProvider::new(true))
    };

    Ok(AppState {
        config: config.clone(),
        secrets,
        prompts,
        traces,
        model,
    })
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.allowed_origin);

    Router::new()
        .route("/evaluate", post(handlers::evaluate))
        .route("/tweet", post(handlers::tweet))
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
    pub async fn build(config: EvaluationConfig) -> Result<Self, AppError> {
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
