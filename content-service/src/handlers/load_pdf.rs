use crate::dtos::{LoadPdfRequest, LoadPdfResponse};
use crate::services::extract::pdf_to_text;
use crate::startup::AppState;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::{Json, response::IntoResponse};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use checker_core::error::AppError;
use uuid::Uuid;

/// Accept a base64-encoded PDF, archive the original, and return its text.
pub async fn load_pdf(
    State(state): State<AppState>,
    payload: Result<Json<LoadPdfRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload.map_err(|_| {
        AppError::ParseError("リクエストボディのJSONパースに失敗しました".to_string())
    })?;

    // 1. Presence check. An empty string counts as missing, like an absent key.
    let pdf_base64 = match request.pdf_base64.as_deref() {
        Some(data) if !data.is_empty() => data,
        _ => {
            return Err(AppError::MissingInput(
                "PDFファイルが入力されていないようです🤔".to_string(),
            ));
        }
    };

    // 2. Decode and cap the upload size.
    let pdf_content = STANDARD.decode(pdf_base64).map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("PDFファイルのデコードに失敗しました: {}", e))
    })?;

    if pdf_content.len() > state.config.pdf.max_bytes {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "PDFファイルが大きすぎます（最大{}MBです）",
            state.config.pdf.max_bytes / (1024 * 1024)
        )));
    }

    // 3. Archive the original before extraction so a parser failure never loses the upload.
    let object_key = format!("uploads/{}.pdf", Uuid::new_v4());
    state
        .storage
        .upload(&object_key, pdf_content.clone())
        .await
        .map_err(|e| {
            AppError::DependencyError(anyhow::anyhow!("PDFファイルのS3保存に失敗しました: {}", e))
        })?;

    // 4. Extract the text.
    let text = pdf_to_text(&pdf_content).map_err(|e| {
        AppError::DependencyError(anyhow::anyhow!("PDFからのテキスト抽出に失敗しました: {}", e))
    })?;

    metrics::counter!("pdf_uploads_total").increment(1);
    tracing::info!(
        object_key = %object_key,
        size_bytes = pdf_content.len(),
        extracted_chars = text.chars().count(),
        "PDF processed"
    );

    Ok(Json(LoadPdfResponse {
        message: "PDFの処理が完了しました".to_string(),
        text,
        object_key,
    }))
}
