//! Model provider abstractions and implementations.
//!
//! This module provides a trait-based abstraction for the grading model,
//! allowing easy swapping between backends (Bedrock, mock).

pub mod bedrock;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("model returned no text content")]
    EmptyResponse,
}

/// Result of a model invocation.
#[derive(Debug, Clone)]
pub struct ModelOutput {
    /// Generated text.
    pub text: String,

    /// Input tokens consumed, when the backend reports usage.
    pub input_tokens: Option<i32>,

    /// Output tokens generated, when the backend reports usage.
    pub output_tokens: Option<i32>,
}

/// Trait for text generation providers (e.g., Bedrock Converse).
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Run one prompt through the model and collect the full response.
    async fn generate(&self, prompt: &str) -> Result<ModelOutput, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;

    /// Identifier recorded on traces for this backend.
    fn model_id(&self) -> &str;
}
