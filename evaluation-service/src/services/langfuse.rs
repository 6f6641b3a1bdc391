//! Prompt registry and trace ingestion client for the Langfuse API.
//!
//! One client serves both concerns. Credentials are not stored on the
//! client: they come out of the per-request secret bundle and are passed
//! into each call.

use super::prompt::{PromptTemplate, embedded_template};
use super::secrets::SecretBundle;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum LangfuseError {
    #[error("Langfuse API returned status {0}: {1}")]
    Api(u16, String),

    #[error("network error: {0}")]
    Network(String),

    #[error("response parse error: {0}")]
    Parse(String),
}

/// Snapshot of one model invocation, shipped to the tracing backend.
#[derive(Debug, Clone)]
pub struct TraceRecord {
    pub trace_id: String,
    pub session_id: String,
    pub user_id: Option<String>,
    pub name: String,
    pub input: String,
    pub output: String,
    pub model: String,
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
}

#[async_trait]
pub trait PromptRegistry: Send + Sync {
    async fn fetch_prompt(
        &self,
        credentials: &SecretBundle,
        name: &str,
    ) -> Result<PromptTemplate, LangfuseError>;
}

#[async_trait]
pub trait TraceSink: Send + Sync {
    async fn flush(
        &self,
        credentials: &SecretBundle,
        record: &TraceRecord,
    ) -> Result<(), LangfuseError>;
}

#[derive(Debug, Deserialize)]
struct PromptApiResponse {
    name: String,
    version: i64,
    prompt: String,
}

#[derive(Debug, Serialize)]
struct IngestionBatch {
    batch: Vec<IngestionEvent>,
}

#[derive(Debug, Serialize)]
struct IngestionEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    timestamp: String,
    body: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TraceBody {
    id: String,
    timestamp: String,
    name: String,
    session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    input: String,
    output: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationBody {
    id: String,
    trace_id: String,
    name: String,
    model: String,
    start_time: String,
    end_time: String,
    input: String,
    output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    usage: Option<GenerationUsage>,
}

#[derive(Debug, Serialize)]
struct GenerationUsage {
    input: i32,
    output: i32,
}

fn ingestion_batch(record: &TraceRecord) -> Result<IngestionBatch, LangfuseError> {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let usage = match (record.input_tokens, record.output_tokens) {
        (Some(input), Some(output)) => Some(GenerationUsage { input, output }),
        _ => None,
    };

    let trace_body = serde_json::to_value(TraceBody {
        id: record.trace_id.clone(),
        timestamp: now.clone(),
        name: record.name.clone(),
        session_id: record.session_id.clone(),
        user_id: record.user_id.clone(),
        input: record.input.clone(),
        output: record.output.clone(),
    })
    .map_err(|e| LangfuseError::Parse(e.to_string()))?;

    let generation_body = serde_json::to_value(GenerationBody {
        id: Uuid::new_v4().to_string(),
        trace_id: record.trace_id.clone(),
        name: record.name.clone(),
        model: record.model.clone(),
        start_time: now.clone(),
        end_time: now.clone(),
        input: record.input.clone(),
        output: record.output.clone(),
        usage,
    })
    .map_err(|e| LangfuseError::Parse(e.to_string()))?;

    Ok(IngestionBatch {
        batch: vec![
            IngestionEvent {
                id: Uuid::new_v4().to_string(),
                event_type: "trace-create".to_string(),
                timestamp: now.clone(),
                body: trace_body,
            },
            IngestionEvent {
                id: Uuid::new_v4().to_string(),
                event_type: "generation-create".to_string(),
                timestamp: now,
                body: generation_body,
            },
        ],
    })
}

pub struct LangfuseClient {
    host: String,
    client: Client,
}

impl LangfuseClient {
    pub fn new(host: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { host, client }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.host.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl PromptRegistry for LangfuseClient {
    async fn fetch_prompt(
        &self,
        credentials: &SecretBundle,
        name: &str,
    ) -> Result<PromptTemplate, LangfuseError> {
        let url = self.api_url(&format!("/api/public/v2/prompts/{}", name));

        let response = self
            .client
            .get(&url)
            .basic_auth(
                &credentials.langfuse_public_key,
                Some(&credentials.langfuse_secret_key),
            )
            .send()
            .await
            .map_err(|e| LangfuseError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LangfuseError::Api(status, body));
        }

        let prompt: PromptApiResponse = response
            .json()
            .await
            .map_err(|e| LangfuseError::Parse(e.to_string()))?;

        tracing::debug!(name = %prompt.name, version = prompt.version, "prompt fetched");

        Ok(PromptTemplate {
            name: prompt.name,
            version: Some(prompt.version),
            text: prompt.prompt,
        })
    }
}

#[async_trait]
impl TraceSink for LangfuseClient {
    async fn flush(
        &self,
        credentials: &SecretBundle,
        record: &TraceRecord,
    ) -> Result<(), LangfuseError> {
        let batch = ingestion_batch(record)?;
        let url = self.api_url("/api/public/ingestion");

        let response = self
            .client
            .post(&url)
            .basic_auth(
                &credentials.langfuse_public_key,
                Some(&credentials.langfuse_secret_key),
            )
            .json(&batch)
            .send()
            .await
            .map_err(|e| LangfuseError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LangfuseError::Api(status, body));
        }

        tracing::debug!(trace_id = %record.trace_id, "trace batch accepted");
        Ok(())
    }
}

/// Mock prompt registry for testing, serving the embedded templates.
pub struct MockPromptRegistry {
    enabled: bool,
    fetch_count: AtomicU64,
}

impl MockPromptRegistry {
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
impl PromptRegistry for MockPromptRegistry {
    async fn fetch_prompt(
        &self,
        _credentials: &SecretBundle,
        name: &str,
    ) -> Result<PromptTemplate, LangfuseError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if !self.enabled {
            return Err(LangfuseError::Api(
                503,
                "mock prompt registry is not enabled".to_string(),
            ));
        }

        embedded_template(name)
            .ok_or_else(|| LangfuseError::Parse(format!("unknown prompt template: {}", name)))
    }
}

/// Mock trace sink for testing
pub struct MockTraceSink {
    enabled: bool,
    flush_count: AtomicU64,
    last_record: Mutex<Option<TraceRecord>>,
}

impl MockTraceSink {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            flush_count: AtomicU64::new(0),
            last_record: Mutex::new(None),
        }
    }

    pub fn flush_count(&self) -> u64 {
        self.flush_count.load(Ordering::SeqCst)
    }

    pub fn last_record(&self) -> Option<TraceRecord> {
        self.last_record.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl TraceSink for MockTraceSink {
    async fn flush(
        &self,
        _credentials: &SecretBundle,
        record: &TraceRecord,
    ) -> Result<(), LangfuseError> {
        self.flush_count.fetch_add(1, Ordering::SeqCst);

        if !self.enabled {
            return Err(LangfuseError::Network(
                "mock trace sink is not enabled".to_string(),
            ));
        }

        if let Ok(mut guard) = self.last_record.lock() {
            *guard = Some(record.clone());
        }

        tracing::info!(
            trace_id = %record.trace_id,
            session_id = %record.session_id,
            "[MOCK] trace would be exported"
        );
        Ok(())
    }
}
