//! Bedrock Converse provider implementation.

use super::{ModelOutput, ModelProvider, ProviderError};
use crate::config::BedrockConfig;
use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message,
};

/// Text generation backed by the Bedrock Converse API.
///
/// The model is addressed by inference profile ARN, so one deployment can
/// point at different underlying models per region without a code change.
pub struct BedrockProvider {
    client: BedrockClient,
    inference_profile_arn: String,
    max_tokens: i32,
}

impl BedrockProvider {
    pub fn new(client: BedrockClient, config: &BedrockConfig) -> Self {
        Self {
            client,
            inference_profile_arn: config.inference_profile_arn.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl ModelProvider for BedrockProvider {
    async fn generate(&self, prompt: &str) -> Result<ModelOutput, ProviderError> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt.to_string()))
            .build()
            .map_err(|e| ProviderError::ApiError(format!("message build failed: {}", e)))?;

        let inference_config = InferenceConfiguration::builder()
            .max_tokens(self.max_tokens)
            .build();

        let response = self
            .client
            .converse()
            .model_id(&self.inference_profile_arn)
            .messages(message)
            .inference_config(inference_config)
            .send()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Converse call failed: {}", e)))?;

        let text = response
            .output()
            .and_then(|output| output.as_message().ok())
            .and_then(|message| message.content().first())
            .and_then(|block| block.as_text().ok())
            .cloned()
            .ok_or(ProviderError::EmptyResponse)?;

        let usage = response.usage();
        let input_tokens = usage.map(|u| u.input_tokens());
        let output_tokens = usage.map(|u| u.output_tokens());

        metrics::counter!("model_invocations_total", "provider" => "bedrock").increment(1);
        tracing::debug!(
            input_tokens = ?input_tokens,
            output_tokens = ?output_tokens,
            "Converse call completed"
        );

        Ok(ModelOutput {
            text,
            input_tokens,
            output_tokens,
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.inference_profile_arn.is_empty() {
            return Err(ProviderError::NotConfigured(
                "inference profile ARN is not set".to_string(),
            ));
        }
        Ok(())
    }

    fn model_id(&self) -> &str {
        &self.inference_profile_arn
    }
}
