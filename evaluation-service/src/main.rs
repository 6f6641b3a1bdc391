use checker_core::error::AppError;
use checker_core::observability::{init_metrics, init_tracing};
use evaluation_service::config::EvaluationConfig;
use evaluation_service::startup::Application;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Metrics recorder must be installed before any metrics are recorded.
    init_metrics();
    init_tracing("evaluation-service", "info");

    let config = EvaluationConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    tracing::info!(
        environment = ?config.environment,
        secrets_enabled = config.secrets.enabled,
        registry_enabled = config.langfuse.registry_enabled,
        tracing_enabled = config.langfuse.tracing_enabled,
        bedrock_enabled = config.bedrock.enabled,
        "Starting evaluation service"
    );

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
