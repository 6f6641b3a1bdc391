pub mod langfuse;
pub mod prompt;
pub mod providers;
pub mod secrets;

pub use langfuse::{LangfuseClient, PromptRegistry, TraceRecord, TraceSink};
pub use secrets::{SecretBundle, SecretsProvider};
