use crate::dtos::{TweetRequest, TweetResponse};
use crate::services::TraceRecord;
use crate::services::prompt::{TWEET_PROMPT_NAME, TWEET_RUN_NAME};
use crate::startup::AppState;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::{Json, response::IntoResponse};
use checker_core::error::AppError;
use uuid::Uuid;

/// Draft a promotional tweet from an evaluation verdict.
pub async fn tweet(
    State(state): State<AppState>,
    payload: Result<Json<TweetRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload.map_err(|_| {
        AppError::ParseError("リクエストボディのJSONパースに失敗しました".to_string())
    })?;

    let eval_result = match request.eval_result.as_deref() {
        Some(result) if !result.is_empty() => result.to_string(),
        _ => {
            return Err(AppError::MissingInput(
                "アウトプットの内容が入力されていないようです🤔".to_string(),
            ));
        }
    };

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

    let template = state
        .prompts
        .fetch_prompt(&credentials, TWEET_PROMPT_NAME)
        .await
        .map_err(|e| {
            AppError::DependencyError(anyhow::anyhow!("ツイート生成に失敗しました: {}", e))
        })?;
    let prompt = template.render("eval_result", &eval_result);

    let output = state.model.generate(&prompt).await.map_err(|e| {
        AppError::DependencyError(anyhow::anyhow!("ツイート生成に失敗しました: {}", e))
    })?;

    // Trace export stays best-effort here as well.
    let record = TraceRecord {
        trace_id: trace_id.clone(),
        session_id: session_id.clone(),
        user_id: request.user_email.clone(),
        name: TWEET_RUN_NAME.to_string(),
        input: eval_result,
        output: output.text.clone(),
        model: state.model.model_id().to_string(),
        input_tokens: output.input_tokens,
        output_tokens: output.output_tokens,
    };

    if let Err(e) = state.traces.flush(&credentials, &record).await {
        tracing::warn!(trace_id = %trace_id, error = %e, "trace export failed");
    }

    metrics::counter!("tweet_generations_total").increment(1);
    tracing::info!(trace_id = %trace_id, session_id = %session_id, "tweet generation completed");

    Ok(Json(TweetResponse {
        message: output.text,
    }))
}
