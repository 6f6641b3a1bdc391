//! Secret resolution against the Secrets Manager extension endpoint.
//!
//! Secrets are fetched fresh on every invocation; nothing is cached and a
//! failed fetch is surfaced to the caller unchanged.

use crate::config::SecretsConfig;
use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

const REQUIRED_KEYS: [&str; 2] = ["LANGFUSE_SECRET_KEY", "LANGFUSE_PUBLIC_KEY"];

#[derive(Debug, Error)]
pub enum SecretsError {
    #[error("シークレット取得APIが失敗しました。: {0} （再実行してみてください🙏）")]
    Api(u16),

    #[error("必要なシークレットキーが見つかりません")]
    MissingKeys,

    #[error("シークレット取得時にネットワークエラーが発生しました: {0}")]
    Network(String),

    #[error("シークレットのJSONパースに失敗しました: {0}")]
    Json(String),

    #[error("シークレットの取得に失敗しました: {0}")]
    Retrieval(String),
}

/// The resolved credential pair for the tracing backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretBundle {
    pub langfuse_public_key: String,
    pub langfuse_secret_key: String,
}

impl SecretBundle {
    pub fn from_map(values: &HashMap<String, String>) -> Result<Self, SecretsError> {
        if !REQUIRED_KEYS.iter().all(|key| values.contains_key(*key)) {
            return Err(SecretsError::MissingKeys);
        }
        Ok(SecretBundle {
            langfuse_public_key: values["LANGFUSE_PUBLIC_KEY"].clone(),
            langfuse_secret_key: values["LANGFUSE_SECRET_KEY"].clone(),
        })
    }
}

/// Normalize a secret store response body to a flat key/value map.
///
/// `SecretString` arrives either as a JSON object or as a JSON-encoded
/// string wrapping one; both forms resolve to the same map.
pub fn parse_secret_string(payload: &str) -> Result<HashMap<String, String>, SecretsError> {
    let outer: Value =
        serde_json::from_str(payload).map_err(|e| SecretsError::Json(e.to_string()))?;
    let secret_string = outer
        .get("SecretString")
        .cloned()
        .ok_or_else(|| SecretsError::Retrieval("SecretString field missing".to_string()))?;

    match secret_string {
        Value::String(inner) => {
            serde_json::from_str(&inner).map_err(|e| SecretsError::Json(e.to_string()))
        }
        Value::Object(_) => {
            serde_json::from_value(secret_string).map_err(|e| SecretsError::Json(e.to_string()))
        }
        other => Err(SecretsError::Retrieval(format!(
            "unexpected SecretString shape: {}",
            other
        ))),
    }
}

#[async_trait]
pub trait SecretsProvider: Send + Sync {
    async fn fetch(&self) -> Result<SecretBundle, SecretsError>;
}

pub struct HttpSecretsProvider {
    config: SecretsConfig,
    client: Client,
}

impl HttpSecretsProvider {
    pub fn new(config: SecretsConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl SecretsProvider for HttpSecretsProvider {
    async fn fetch(&self) -> Result<SecretBundle, SecretsError> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .header(
                "X-Aws-Parameters-Secrets-Token",
                self.config.session_token.as_str(),
            )
            .send()
            .await
            .map_err(|e| SecretsError::Network(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(SecretsError::Api(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SecretsError::Network(e.to_string()))?;
        let values = parse_secret_string(&body)?;
        SecretBundle::from_map(&values)
    }
}

/// Mock secrets provider for testing
pub struct MockSecretsProvider {
    enabled: bool,
    fetch_count: AtomicU64,
}

impl MockSecretsProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            fetch_count: AtomicU64::new(0),
        }
    }

    pub fn fetch_count(&self) -> u64 {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretsProvider for MockSecretsProvider {
    async fn fetch(&self) -> Result<SecretBundle, SecretsError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if !self.enabled {
            return Err(SecretsError::Api(503));
        }

        tracing::info!("[MOCK] secret bundle served");

        Ok(SecretBundle {
            langfuse_public_key: "pk-lf-mock".to_string(),
            langfuse_secret_key: "sk-lf-mock".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_string_as_object_parses_once() {
        let payload = r#"{"SecretString": {"LANGFUSE_SECRET_KEY": "sk", "LANGFUSE_PUBLIC_KEY": "pk"}}"#;
        let values = parse_secret_string(payload).unwrap();
        assert_eq!(values["LANGFUSE_SECRET_KEY"], "sk");
        assert_eq!(values["LANGFUSE_PUBLIC_KEY"], "pk");
    }

    #[test]
    fn double_encoded_secret_string_parses_twice() {
        let payload =
            r#"{"SecretString": "{\"LANGFUSE_SECRET_KEY\": \"sk\", \"LANGFUSE_PUBLIC_KEY\": \"pk\"}"}"#;
        let values = parse_secret_string(payload).unwrap();
        assert_eq!(values["LANGFUSE_SECRET_KEY"], "sk");
        assert_eq!(values["LANGFUSE_PUBLIC_KEY"], "pk");
    }

    #[test]
    fn both_encodings_resolve_to_the_same_map() {
        let object_form = r#"{"SecretString": {"LANGFUSE_SECRET_KEY": "sk", "LANGFUSE_PUBLIC_KEY": "pk"}}"#;
        let string_form =
            r#"{"SecretString": "{\"LANGFUSE_SECRET_KEY\": \"sk\", \"LANGFUSE_PUBLIC_KEY\": \"pk\"}"}"#;
        assert_eq!(
            parse_secret_string(object_form).unwrap(),
            parse_secret_string(string_form).unwrap()
        );
    }

    #[test]
    fn malformed_payload_is_a_json_error() {
        let err = parse_secret_string("not json").unwrap_err();
        assert!(matches!(err, SecretsError::Json(_)));
    }

    #[test]
    fn missing_required_key_is_rejected() {
        let mut values = HashMap::new();
        values.insert("LANGFUSE_PUBLIC_KEY".to_string(), "pk".to_string());
        let err = SecretBundle::from_map(&values).unwrap_err();
        assert!(matches!(err, SecretsError::MissingKeys));
    }

    #[test]
    fn bundle_keeps_both_keys() {
        let mut values = HashMap::new();
        values.insert("LANGFUSE_PUBLIC_KEY".to_string(), "pk".to_string());
        values.insert("LANGFUSE_SECRET_KEY".to_string(), "sk".to_string());
        values.insert("UNRELATED".to_string(), "x".to_string());
        let bundle = SecretBundle::from_map(&values).unwrap();
        assert_eq!(bundle.langfuse_public_key, "pk");
        assert_eq!(bundle.langfuse_secret_key, "sk");
    }
}
