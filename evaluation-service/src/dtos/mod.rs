use serde::{Deserialize, Serialize};

/// Body of `POST /evaluate`.
///
/// Every field is optional at the schema level; the handler owns the
/// presence check so the fixed user-facing message is returned instead of a
/// deserialization error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub blog_content: Option<String>,
    pub user_email: Option<String>,
    pub langfuse_session_id: Option<String>,
}

/// Body of `POST /tweet`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetRequest {
    pub eval_result: Option<String>,
    pub user_email: Option<String>,
    pub langfuse_session_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResponse {
    pub message: String,
    pub trace_id: String,
    pub langfuse_session_id: String,
}

#[derive(Debug, Serialize)]
pub struct TweetResponse {
    pub message: String,
}
