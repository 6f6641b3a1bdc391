use crate::dtos::{LoadUrlRequest, LoadUrlResponse};
use crate::services::extract::html_to_text;
use crate::startup::AppState;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::{Json, response::IntoResponse};
use checker_core::error::AppError;
use validator::Validate;

/// Fetch a web page and reduce it to whitespace-normalized plain text.
pub async fn load_url(
    State(state): State<AppState>,
    payload: Result<Json<LoadUrlRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload.map_err(|_| {
        AppError::ParseError("リクエストボディのJSONパースに失敗しました".to_string())
    })?;

    // 1. Presence check. An empty string counts as missing, like an absent key.
    let url = match request.url.as_deref() {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => return Err(AppError::MissingInput("URLが必要です".to_string())),
    };

    request.validate()?;

    // 2. Fetch the page and strip it down to readable text.
    let html = state.fetcher.fetch(&url).await.map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("URLの取得に失敗しました: {}", e))
    })?;

    let text = html_to_text(&html);

    metrics::counter!("url_loads_total").increment(1);
    tracing::info!(url = %url, extracted_chars = text.chars().count(), "page text extracted");

    Ok(Json(LoadUrlResponse { message: text }))
}
