use checker_core::error::AppError;
use checker_core::observability::{init_metrics, init_tracing};
use content_service::config::ContentConfig;
use content_service::startup::Application;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Metrics recorder must be installed before any metrics are recorded.
    init_metrics();
    init_tracing("content-service", "info");

    let config = ContentConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    tracing::info!(
        environment = ?config.environment,
        storage_backend = ?config.storage.backend,
        "Starting content service"
    );

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
