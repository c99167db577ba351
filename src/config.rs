//! Configuration types for quizgen

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};
use utoipa::ToSchema;

/// Where uploads and generator output live, and which uploads are accepted
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct StorageConfig {
    /// Directory uploaded documents are written to (default: "./uploads")
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Working directory the generator runs in (default: ".")
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// Generator output file (default: "generated_questions.txt")
    ///
    /// Relative paths are resolved against `work_dir`.
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    /// Media types accepted for upload (default: ["application/pdf"])
    #[serde(default = "default_accepted_media_types")]
    pub accepted_media_types: Vec<String>,

    /// Maximum accepted request body size in bytes (default: 50 MiB)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            work_dir: default_work_dir(),
            output_file: default_output_file(),
            accepted_media_types: default_accepted_media_types(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl StorageConfig {
    /// Absolute-or-relative path of the generator output file, resolved against `work_dir`
    pub fn output_path(&self) -> PathBuf {
        if self.output_file.is_absolute() {
            self.output_file.clone()
        } else {
            self.work_dir.join(&self.output_file)
        }
    }

    /// Whether `media_type` (parameters such as `; charset=` ignored) is accepted
    pub fn accepts(&self, media_type: &str) -> bool {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        !essence.is_empty()
            && self
                .accepted_media_types
                .iter()
                .any(|accepted| accepted.eq_ignore_ascii_case(&essence))
    }
}

/// External generator invocation
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct GeneratorConfig {
    /// Program name searched for in PATH (default: "quiz-generator")
    #[serde(default = "default_generator_program")]
    pub program: String,

    /// Explicit path to the generator executable (takes precedence over `program`)
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Fixed arguments passed before the document path
    #[serde(default)]
    pub args: Vec<String>,

    /// Whether to search PATH for `program` if `path` is not set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// Fixed delay after the generator exits, before output polling starts (default: 0)
    #[serde(default, with = "duration_millis_serde")]
    #[schema(value_type = u64)]
    pub settle_delay: Duration,

    /// Bounded polling for the output file after the generator exits
    #[serde(default = "default_output_wait")]
    pub output_wait: RetryConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: default_generator_program(),
            path: None,
            args: Vec::new(),
            search_path: true,
            settle_delay: Duration::ZERO,
            output_wait: default_output_wait(),
        }
    }
}

/// Retry configuration with exponential backoff
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 10)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay before first retry, in milliseconds (default: 100)
    #[serde(default = "default_initial_delay", with = "duration_millis_serde")]
    #[schema(value_type = u64)]
    pub initial_delay: Duration,

    /// Maximum delay between retries, in milliseconds (default: 2000)
    #[serde(default = "default_max_delay", with = "duration_millis_serde")]
    #[schema(value_type = u64)]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

/// What an upload does when another upload is already running
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UploadPolicy {
    /// Answer immediately with a conflict error
    #[default]
    Reject,
    /// Wait for the running cycle to finish, then run
    Queue,
}

/// Main configuration for [`QuizPipeline`](crate::QuizPipeline)
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Upload and output locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// External generator settings
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Behaviour of concurrent uploads
    #[serde(default)]
    pub upload_policy: UploadPolicy,

    /// API and external server integration
    #[serde(default)]
    pub server: ServerIntegrationConfig,
}

impl Config {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|e| Error::Config {
            message: e.message().to_string(),
            key: None,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read {}: {}", path.display(), e),
            key: None,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check settings that serde defaults cannot enforce
    pub fn validate(&self) -> Result<()> {
        if self.storage.accepted_media_types.is_empty() {
            return Err(Error::Config {
                message: "at least one accepted media type is required".to_string(),
                key: Some("storage.accepted_media_types".to_string()),
            });
        }
        if self.storage.max_upload_bytes == 0 {
            return Err(Error::Config {
                message: "upload size limit must be greater than zero".to_string(),
                key: Some("storage.max_upload_bytes".to_string()),
            });
        }
        if self.generator.path.is_none() && self.generator.program.trim().is_empty() {
            return Err(Error::Config {
                message: "a generator program or path is required".to_string(),
                key: Some("generator.program".to_string()),
            });
        }
        let multiplier = self.generator.output_wait.backoff_multiplier;
        if !(1.0..=MAX_BACKOFF_MULTIPLIER).contains(&multiplier) {
            return Err(Error::Config {
                message: format!("backoff multiplier must be between 1.0 and {MAX_BACKOFF_MULTIPLIER}"),
                key: Some("generator.output_wait.backoff_multiplier".to_string()),
            });
        }
        Ok(())
    }
}

/// Groups settings for external access and control interfaces.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ServerIntegrationConfig {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:5137)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Optional API key for authentication
    #[serde(default)]
    pub api_key: Option<String>,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            api_key: None,
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_file() -> PathBuf {
    PathBuf::from("generated_questions.txt")
}

fn default_accepted_media_types() -> Vec<String> {
    vec!["application/pdf".to_string()]
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_generator_program() -> String {
    "quiz-generator".to_string()
}

fn default_true() -> bool {
    true
}

fn default_output_wait() -> RetryConfig {
    RetryConfig::default()
}

fn default_max_attempts() -> u32 {
    10
}

fn default_initial_delay() -> Duration {
    Duration::from_millis(100)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(2)
}

/// Upper bound accepted for `RetryConfig::backoff_multiplier`
pub const MAX_BACKOFF_MULTIPLIER: f64 = 10.0;

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5137))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

// Duration serialization helper (milliseconds)
mod duration_millis_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
