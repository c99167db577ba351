//! Error types for quizgen
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error types (validation, generation, filesystem)
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for quizgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for quizgen
///
/// Each variant carries enough context to diagnose the failure from the API
/// response alone.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "upload_dir")
        key: Option<String>,
    },

    /// The upload request was rejected before any side effect
    #[error("invalid upload: {0}")]
    Validation(#[from] ValidationError),

    /// The external generator failed or produced no output
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Another upload is currently running through the pipeline
    #[error("a generation cycle is already in progress")]
    GenerationInProgress,

    /// The generator output file could not be read
    #[error("question output unavailable at {}: {reason}", .path.display())]
    OutputUnavailable {
        /// Where the output file was expected
        path: PathBuf,
        /// Why it could not be read
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Operation not supported (no generator binary available)
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Reasons an upload is rejected before it touches the filesystem
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The request carried no file part
    #[error("no file provided; exactly one document is required")]
    NoFile,

    /// The request carried more than one file part
    #[error("{count} files provided; exactly one document is allowed")]
    TooManyFiles {
        /// Number of file parts in the request
        count: usize,
    },

    /// The declared media type is not an accepted document type
    #[error("unsupported media type {media_type}; accepted: {}", .accepted.join(", "))]
    UnsupportedMediaType {
        /// Media type declared for the file part ("" when absent)
        media_type: String,
        /// Media types the service accepts
        accepted: Vec<String>,
    },

    /// The file part has no usable filename
    #[error("file has no usable filename")]
    MissingFilename,

    /// The file part is empty
    #[error("file {filename} is empty")]
    EmptyFile {
        /// Name of the empty file
        filename: String,
    },

    /// The multipart body could not be read
    #[error("malformed upload: {0}")]
    Malformed(String),

    /// The request body is larger than `storage.max_upload_bytes`
    #[error("upload exceeds the {limit} byte limit")]
    TooLarge {
        /// Configured limit in bytes
        limit: usize,
    },
}

/// Failures of the external generator process
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The generator process could not be started
    #[error("failed to launch {program}: {reason}")]
    Launch {
        /// The program that was executed
        program: String,
        /// The underlying launch error
        reason: String,
    },

    /// The generator exited with a non-zero status
    #[error("generator exited with {}: {}", describe_exit(.exit_code), .stderr.trim())]
    Failed {
        /// Exit code, when the process exited normally
        exit_code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// The generator exited successfully but its output never appeared
    #[error("output file {} was not written", .path.display())]
    OutputNotReady {
        /// The output file that was polled for
        path: PathBuf,
    },
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// API error response format
///
/// This structure is returned by API endpoints when an error occurs.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "generation_failed",
///     "message": "generation failed: generator exited with status 1: no text layer",
///     "details": {
///       "exit_code": 1,
///       "stderr": "no text layer"
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "too_many_files", "generation_failed")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }

    /// Create an "unauthorized" error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("unauthorized", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - rejected before any side effect
            Error::Config { .. } => 400,
            Error::Validation(ValidationError::TooLarge { .. }) => 413,
            Error::Validation(_) => 400,

            // 409 Conflict - another cycle owns the pipeline
            Error::GenerationInProgress => 409,

            // 500 Internal Server Error - generator and filesystem failures
            Error::Generation(_) => 500,
            Error::OutputUnavailable { .. } => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::NotSupported(_) => 500,
            Error::Other(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Validation(e) => match e {
                ValidationError::NoFile => "missing_file",
                ValidationError::TooManyFiles { .. } => "too_many_files",
                ValidationError::UnsupportedMediaType { .. } => "unsupported_media_type",
                ValidationError::MissingFilename => "missing_filename",
                ValidationError::EmptyFile { .. } => "empty_file",
                ValidationError::Malformed(_) => "malformed_upload",
                ValidationError::TooLarge { .. } => "upload_too_large",
            },
            Error::Generation(e) => match e {
                GenerationError::Launch { .. } => "generator_launch_failed",
                GenerationError::Failed { .. } => "generation_failed",
                GenerationError::OutputNotReady { .. } => "output_not_ready",
            },
            Error::GenerationInProgress => "generation_in_progress",
            Error::OutputUnavailable { .. } => "output_unavailable",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::NotSupported(_) => "not_supported",
            Error::Other(_) => "internal_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            Error::Validation(ValidationError::TooManyFiles { count }) => {
                Some(serde_json::json!({
                    "file_count": count,
                }))
            }
            Error::Validation(ValidationError::TooLarge { limit }) => Some(serde_json::json!({
                "limit_bytes": limit,
            })),
            Error::Validation(ValidationError::UnsupportedMediaType {
                media_type,
                accepted,
            }) => Some(serde_json::json!({
                "media_type": media_type,
                "accepted": accepted,
            })),
            Error::Generation(GenerationError::Launch { program, reason }) => {
                Some(serde_json::json!({
                    "program": program,
                    "reason": reason,
                }))
            }
            Error::Generation(GenerationError::Failed { exit_code, stderr }) => {
                Some(serde_json::json!({
                    "exit_code": exit_code,
                    "stderr": stderr,
                }))
            }
            Error::Generation(GenerationError::OutputNotReady { path }) => {
                Some(serde_json::json!({
                    "path": path,
                }))
            }
            Error::OutputUnavailable { path, .. } => Some(serde_json::json!({
                "path": path,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
