#![allow(dead_code)]

use evaluation_service::config::EvaluationConfig;
use evaluation_service::services::langfuse::{MockPromptRegistry, MockTraceSink};
use evaluation_service::services::providers::mock::MockModelProvider;
use evaluation_service::services::secrets::MockSecretsProvider;
use evaluation_service::startup::{AppState, build_router};
use std::sync::Arc;

/// Which mock backends answer successfully for this test app.
#[derive(Clone, Copy)]
pub struct MockBackends {
    pub secrets_enabled: bool,
    pub registry_enabled: bool,
    pub model_enabled: bool,
    pub sink_enabled: bool,
}

impl Default for MockBackends {
    fn default() -> Self {
        Self {
            secrets_enabled: true,
            registry_enabled: true,
            model_enabled: true,
            sink_enabled: true,
        }
    }
}

pub struct TestApp {
    pub address: String,
    pub secrets: Arc<MockSecretsProvider>,
    pub prompts: Arc<MockPromptRegistry>,
    pub traces: Arc<MockTraceSink>,
    pub model: Arc<MockModelProvider>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(MockBackends::default()).await
    }

    pub async fn spawn_with(backends: MockBackends) -> Self {
        // No flags are set in the test environment, so the dev defaults
        // apply and every backend below is one of our handles.
        let config = EvaluationConfig::load().expect("Failed to load configuration");

        let secrets = Arc::new(MockSecretsProvider::new(backends.secrets_enabled));
        let prompts = Arc::new(MockPromptRegistry::new(backends.registry_enabled));
        let traces = Arc::new(MockTraceSink::new(backends.sink_enabled));
        let model = Arc::new(MockModelProvider::new(backends.model_enabled));

        let state = AppState {
            config,
            secrets: secrets.clone(),
            prompts: prompts.clone(),
            traces: traces.clone(),
            model: model.clone(),
        };

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener
            .local_addr()
            .expect("Failed to read local address")
            .port();
        let address = format!("http://127.0.0.1:{}", port);

        let app = build_router(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Wait for the server to accept connections.
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            secrets,
            prompts,
            traces,
            model,
        }
    }
}
