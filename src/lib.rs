//! # quizgen
//!
//! Turns an uploaded document into a multiple-choice quiz.
//!
//! An upload is stored on disk, handed to an external question generator
//! process, and the generator's plain-text output is parsed into structured
//! [`QuestionRecord`]s. The most recent question set is cached in memory and
//! served over a REST API.
//!
//! ## Quick Start
//!
//! ```no_run
//! use quizgen::{Config, IncomingFile, QuizPipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = QuizPipeline::new(Config::default()).await?;
//!
//!     // Watch the cycle progress
//!     let mut events = pipeline.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let outcome = pipeline
//!         .submit_upload(vec![IncomingFile {
//!             filename: Some("lecture.pdf".to_string()),
//!             media_type: Some("application/pdf".to_string()),
//!             bytes: std::fs::read("lecture.pdf")?,
//!         }])
//!         .await?;
//!
//!     for question in outcome.questions.iter() {
//!         println!("{} -> {}", question.question, question.answer);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Question cache with epoch-guarded repopulation
pub mod cache;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// External question generator invocation
pub mod generator;
/// Generator output parser
pub mod parser;
/// Upload → generate → parse → cache pipeline
pub mod pipeline;
/// Retry logic with exponential backoff
pub mod retry;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::{Config, UploadPolicy};
pub use error::{
    ApiError, Error, ErrorDetail, GenerationError, Result, ToHttpStatus, ValidationError,
};
pub use generator::{CliGenerator, Generator, UnavailableGenerator};
pub use pipeline::{IncomingFile, QuizPipeline, UploadOutcome};
pub use types::{Event, ParseReport, PipelineStatus, QuestionRecord, QuestionSet, UploadResponse};

/// Resolves when the process receives a termination signal
///
/// Pass it to [`api::start_api_server`] for graceful shutdown.
///
/// - **Unix:** SIGTERM or SIGINT, falling back to whichever handler could be registered.
/// - **Windows/other:** Ctrl+C via `tokio::signal::ctrl_c()`.
pub async fn shutdown_signal() {
    wait_for_signal().await;
    tracing::info!("Shutting down");
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration can fail in restricted environments (containers, tests)
    match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM signal"),
                _ = sigint.recv() => tracing::info!("Received SIGINT signal (Ctrl+C)"),
            }
        }
        (Err(e), Ok(mut sigint)) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            sigint.recv().await;
            tracing::info!("Received SIGINT signal (Ctrl+C)");
        }
        (Ok(mut sigterm), Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            sigterm.recv().await;
            tracing::info!("Received SIGTERM signal");
        }
        (Err(e), Err(_)) => {
            tracing::error!(error = %e, "Could not register any signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C signal"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C signal"),
    }
}
