//! Upload → generate → parse → cache pipeline
//!
//! [`QuizPipeline`] owns the question cache, the generator, and the lock that
//! serialises uploads. Its methods are organized by concern:
//! - [`upload`] - Upload validation, storage, and the generation cycle
//! - [`questions`] - Cached reads with lazy rebuild from the output file

mod questions;
mod upload;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

pub use upload::{IncomingFile, UploadOutcome, sanitize_filename};

use crate::cache::QuestionCache;
use crate::config::Config;
use crate::error::Result;
use crate::generator::{self, Generator};
use crate::types::{Event, PipelineStatus};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};

/// Outcome of the most recent cycles, reported by `GET /status`
#[derive(Debug, Default)]
pub(crate) struct CycleState {
    pub(crate) last_document: Option<String>,
    pub(crate) last_generated_at: Option<DateTime<Utc>>,
    pub(crate) last_error: Option<String>,
    pub(crate) dropped_blocks: usize,
    /// Set while the output file may still belong to a previous document
    pub(crate) output_untrusted: bool,
}

/// Main pipeline instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct QuizPipeline {
    /// Configuration (shared with the API layer)
    pub(crate) config: Arc<Config>,
    /// Most recently parsed question set
    pub(crate) cache: Arc<QuestionCache>,
    /// Question generator (trait object for pluggable implementations)
    pub(crate) generator: Arc<dyn Generator>,
    /// Held for the whole upload cycle; at most one cycle runs at a time
    pub(crate) upload_lock: Arc<tokio::sync::Mutex<()>>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
    /// Diagnostics about recent cycles
    pub(crate) cycle_state: Arc<Mutex<CycleState>>,
}

impl QuizPipeline {
    /// Create a pipeline, discovering the generator from configuration
    ///
    /// Creates the upload directory if needed.
    pub async fn new(config: Config) -> Result<Self> {
        let generator = generator::from_config(&config.generator, &config.storage.work_dir);
        Self::with_generator(config, generator).await
    }

    /// Create a pipeline with an explicit generator implementation
    pub async fn with_generator(config: Config, generator: Arc<dyn Generator>) -> Result<Self> {
        config.validate()?;
        tokio::fs::create_dir_all(&config.storage.upload_dir).await?;

        let (event_tx, _rx) = tokio::sync::broadcast::channel(256);

        tracing::info!(
            upload_dir = %config.storage.upload_dir.display(),
            output_file = %config.storage.output_path().display(),
            policy = ?config.upload_policy,
            "Quiz pipeline initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            cache: Arc::new(QuestionCache::new()),
            generator,
            upload_lock: Arc::new(tokio::sync::Mutex::new(())),
            event_tx,
            cycle_state: Arc::new(Mutex::new(CycleState::default())),
        })
    }

    /// Configuration this pipeline was built with
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Subscribe to pipeline events
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Broadcast an event; having no subscribers is not an error
    pub(crate) fn emit_event(&self, event: Event) {
        let _ = self.event_tx.send(event);
    }

    /// Whether an upload cycle currently holds the pipeline
    pub fn is_generating(&self) -> bool {
        self.upload_lock.try_lock().is_err()
    }

    /// Drop the cached questions; the next read rebuilds from the output file
    pub fn invalidate_cache(&self) {
        self.cache.invalidate();
        self.emit_event(Event::CacheInvalidated);
    }

    /// Snapshot of cache and cycle state
    pub fn status(&self) -> PipelineStatus {
        let cached = self.cache.get();
        let state = self.cycle_state();
        PipelineStatus {
            cache_warm: cached.is_some(),
            cached_questions: cached.map_or(0, |q| q.len()),
            dropped_blocks: state.dropped_blocks,
            generation_in_progress: self.is_generating(),
            last_document: state.last_document.clone(),
            last_generated_at: state.last_generated_at,
            last_error: state.last_error.clone(),
        }
    }

    pub(crate) fn cycle_state(&self) -> MutexGuard<'_, CycleState> {
        self.cycle_state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
