//! Cached question reads

use super::QuizPipeline;
use crate::error::{Error, Result};
use crate::parser::parse_report;
use crate::types::{Event, QuestionSet};
use std::sync::Arc;

impl QuizPipeline {
    /// Current question set
    ///
    /// Served from the cache when warm. A cold cache is rebuilt from the
    /// generator output file; the rebuild is discarded if an upload
    /// invalidated the cache while the file was being read.
    ///
    /// # Errors
    ///
    /// - [`Error::GenerationInProgress`] if the cache is cold because an
    ///   upload is running
    /// - [`Error::OutputUnavailable`] if the output file cannot be read, or
    ///   if a failed upload could not remove the previous document's output
    pub async fn questions(&self) -> Result<Arc<QuestionSet>> {
        let (epoch, cached) = self.cache.snapshot();
        if let Some(questions) = cached {
            return Ok(questions);
        }

        if self.is_generating() {
            return Err(Error::GenerationInProgress);
        }

        let path = self.config.storage.output_path();
        if self.cycle_state().output_untrusted {
            return Err(Error::OutputUnavailable {
                path,
                reason: "previous generator output could not be removed".to_string(),
            });
        }

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                if self.cache.snapshot().0 != epoch {
                    return Err(Error::GenerationInProgress);
                }
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Generator output unavailable for cache rebuild"
                );
                return Err(Error::OutputUnavailable {
                    path,
                    reason: e.to_string(),
                });
            }
        };

        let report = parse_report(&String::from_utf8_lossy(&bytes));
        let dropped_blocks = report.dropped_blocks;

        match self.cache.populate_if(epoch, report.questions) {
            Some(questions) => {
                self.cycle_state().dropped_blocks = dropped_blocks;
                tracing::info!(
                    questions = questions.len(),
                    dropped_blocks,
                    "Rebuilt question cache from generator output"
                );
                self.emit_event(Event::CacheRebuilt {
                    questions: questions.len(),
                });
                Ok(questions)
            }
            None => {
                tracing::debug!("Discarding stale cache rebuild");
                self.cache.get().ok_or(Error::GenerationInProgress)
            }
        }
    }
}
