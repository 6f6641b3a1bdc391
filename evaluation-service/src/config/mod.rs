use checker_core::config::{self as core_config, Environment, get_env, get_env_flag};
use checker_core::error::AppError;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub secrets: SecretsConfig,
    pub langfuse: LangfuseConfig,
    pub bedrock: BedrockConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecretsConfig {
    /// Secrets Manager extension endpoint serving the Langfuse key pair.
    pub endpoint: String,
    pub session_token: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LangfuseConfig {
    pub host: String,
    pub registry_enabled: bool,
    pub tracing_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BedrockConfig {
    pub inference_profile_arn: String,
    pub max_tokens: i32,
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub allowed_origin: String,
}

impl EvaluationConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let environment = Environment::current();
        let is_prod = environment.is_prod();

        Ok(EvaluationConfig {
            common: common_config,
            environment,
            secrets: SecretsConfig {
                // A full URL wins; otherwise the endpoint is derived from the
                // secret name through the local extension.
                endpoint: match env::var("LANGFUSE_SECRET_URL") {
                    Ok(url) => url,
                    Err(_) => format!(
                        "http://localhost:2773/secretsmanager/get?secretId={}",
                        get_env("LANGFUSE_SECRET_NAME", Some("langfuse"), is_prod)?
                    ),
                },
                session_token: get_env("AWS_SESSION_TOKEN", Some(""), is_prod)?,
                enabled: get_env_flag("SECRETS_ENABLED"),
            },
            langfuse: LangfuseConfig {
                host: get_env("LANGFUSE_HOST", Some("https://cloud.langfuse.com"), is_prod)?,
                registry_enabled: get_env_flag("PROMPT_REGISTRY_ENABLED"),
                tracing_enabled: get_env_flag("LANGFUSE_ENABLED"),
            },
            bedrock: BedrockConfig {
                inference_profile_arn: get_env("BEDROCK_INFERENCE_PROFILE_ARN", Some(""), is_prod)?,
                max_tokens: get_env("BEDROCK_MAX_TOKENS", Some("4096"), is_prod)?
                    .parse()
                    .unwrap_or(4096),
                enabled: get_env_flag("BEDROCK_ENABLED"),
            },
            security: SecurityConfig {
                allowed_origin: get_env("ALLOWED_ORIGIN", Some("*"), is_prod)?,
            },
        })
    }
}
