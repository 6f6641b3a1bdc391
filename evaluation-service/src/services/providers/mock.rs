//! Mock provider implementation for testing.

use super::{ModelOutput, ModelProvider, ProviderError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

pub const MOCK_MODEL_ID: &str = "mock-model";
pub const MOCK_MODEL_RESPONSE: &str =
    "Level 200：構成は明確ですが、アーキテクチャ図と検証手順を足すとさらに良くなります。";

/// Mock model provider for testing.
pub struct MockModelProvider {
    enabled: bool,
    call_count: AtomicU64,
}

impl MockModelProvider {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            call_count: AtomicU64::new(0),
        }
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelProvider for MockModelProvider {
    async fn generate(&self, prompt: &str) -> Result<ModelOutput, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock model provider not enabled".to_string(),
            ));
        }

        tracing::info!("[MOCK] model invocation served");

        Ok(ModelOutput {
            text: MOCK_MODEL_RESPONSE.to_string(),
            input_tokens: Some(prompt.len() as i32 / 4),
            output_tokens: Some(32),
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.enabled {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "Mock model provider not enabled".to_string(),
            ))
        }
    }

    fn model_id(&self) -> &str {
        MOCK_MODEL_ID
    }
}
