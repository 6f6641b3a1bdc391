use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    MissingInput(String),

    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("{0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Dependency error: {0}")]
    DependencyError(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

/// Flatten field-level validation failures into one user-facing line.
fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}の形式が正しくありません", field))
            })
        })
        .collect();
    messages.sort();
    messages.dedup();
    messages.join("、")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            message: String,
        }

        let (status, message) = match self {
            AppError::MissingInput(message) => (StatusCode::BAD_REQUEST, message),
            AppError::ValidationError(errors) => {
                (StatusCode::BAD_REQUEST, validation_message(&errors))
            }
            AppError::BadRequest(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::ParseError(message) => (StatusCode::BAD_REQUEST, message),
            AppError::ConfigError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("エラーが発生しました: {}", err),
            ),
            AppError::DependencyError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("エラーが発生しました: {}", err),
            ),
            AppError::InternalError(err) => {
                // The cause goes to the log only; the body stays generic.
                tracing::error!(error = ?err, "unexpected error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "予期せぬエラーが発生しました".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}
