use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /load-url`.
///
/// Presence is checked by the handler so the fixed user-facing message
/// wins over a schema error; the format check runs after that.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoadUrlRequest {
    #[validate(url(message = "URLの形式が正しくありません"))]
    pub url: Option<String>,
}

/// Body of `POST /load-pdf`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPdfRequest {
    pub pdf_base64: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoadUrlResponse {
    /// Extracted page text. The field name is part of the legacy contract.
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPdfResponse {
    pub message: String,
    pub text: String,
    pub object_key: String,
}
