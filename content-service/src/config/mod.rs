use checker_core::config::{self as core_config, Environment, get_env};
use checker_core::error::AppError;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub environment: Environment,
    pub storage: StorageConfig,
    pub fetch: FetchConfig,
    pub pdf: PdfConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub local_path: String,
    pub s3_bucket: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Local,
    S3,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub max_bytes: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PdfConfig {
    pub max_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub allowed_origin: String,
}

impl ContentConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let environment = Environment::current();
        let is_prod = environment.is_prod();

        Ok(ContentConfig {
            common: common_config,
            environment,
            storage: StorageConfig {
                backend: get_env("STORAGE_BACKEND", Some("local"), is_prod)?
                    .parse()
                    .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
                local_path: get_env("STORAGE_LOCAL_PATH", Some("storage"), is_prod)?,
                s3_bucket: env::var("S3_BUCKET_NAME").ok(),
            },
            fetch: FetchConfig {
                timeout_secs: get_env("FETCH_TIMEOUT_SECS", Some("30"), is_prod)?
                    .parse()
                    .unwrap_or(30),
                max_bytes: get_env("FETCH_MAX_BYTES", Some("5242880"), is_prod)?
                    .parse()
                    .unwrap_or(5 * 1024 * 1024),
            },
            pdf: PdfConfig {
                max_bytes: get_env("MAX_PDF_BYTES", Some("20971520"), is_prod)?
                    .parse()
                    .unwrap_or(20 * 1024 * 1024),
            },
            security: SecurityConfig {
                allowed_origin: get_env("ALLOWED_ORIGIN", Some("*"), is_prod)?,
            },
        })
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(StorageBackend::Local),
            "s3" => Ok(StorageBackend::S3),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}
