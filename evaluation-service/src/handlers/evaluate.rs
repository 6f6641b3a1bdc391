use crate::dtos::{EvaluateRequest, EvaluateResponse};
use crate::services::TraceRecord;
use crate::services::prompt::{EVALUATION_PROMPT_NAME, EVALUATION_RUN_NAME};
use crate::startup::AppState;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::{Json, response::IntoResponse};
use checker_core::error::AppError;
use uuid::Uuid;

/// Grade a blog draft against the level scale and return the verdict.
pub async fn evaluate(
    State(state): State<AppState>,
    payload: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload.map_err(|_| {
        AppError::ParseError("リクエストボディのJSONパースに失敗しました".to_string())
    })?;

    // 1. Presence check. An empty string counts as missing, like an absent key.
    let blog_content = match request.blog_content.as_deref() {
        Some(content) if !content.is_empty() => content.to_string(),
        _ => {
            return Err(AppError::MissingInput(
                "アウトプットの内容が入力されていないようです🤔".to_string(),
            ));
        }
    };

    // 2. Resolve Langfuse credentials for this request.
    let credentials = state
        .secrets
        .fetch()
        .await
        .map_err(|e| AppError::DependencyError(anyhow::Error::new(e)))?;

    let session_id = match request.langfuse_session_id.as_deref() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => Uuid::new_v4().to_string(),
    };
    let trace_id = Uuid::new_v4().to_string();

    // 3. Build the prompt and run the model.
    let template = state
        .prompts
        .fetch_prompt(&credentials, EVALUATION_PROMPT_NAME)
        .await
        .map_err(|e| {
            AppError::DependencyError(anyhow::anyhow!("出力評価に失敗しました: {}", e))
        })?;
    let prompt = template.render("blog_content", &blog_content);

    let output = state.model.generate(&prompt).await.map_err(|e| {
        AppError::DependencyError(anyhow::anyhow!("出力評価に失敗しました: {}", e))
    })?;

    // 4. Ship the trace. Export failures must not fail the evaluation.
    let record = TraceRecord {
        trace_id: trace_id.clone(),
        session_id: session_id.clone(),
        user_id: request.user_email.clone(),
        name: EVALUATION_RUN_NAME.to_string(),
        input: blog_content,
        output: output.text.clone(),
        model: state.model.model_id().to_string(),
        input_tokens: output.input_tokens,
        output_tokens: output.output_tokens,
    };

    if let Err(e) = state.traces.flush(&credentials, &record).await {
        tracing::warn!(trace_id = %trace_id, error = %e, "trace export failed");
    }

    metrics::counter!("evaluations_total").increment(1);
    tracing::info!(trace_id = %trace_id, session_id = %session_id, "evaluation completed");

    Ok(Json(EvaluateResponse {
        message: output.text,
        trace_id,
        langfuse_session_id: session_id,
    }))
}
