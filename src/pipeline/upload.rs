//! Upload validation, storage, and the generation cycle

use super::QuizPipeline;
use crate::config::{StorageConfig, UploadPolicy};
use crate::error::{Error, GenerationError, Result, ValidationError};
use crate::generator::{remove_stale_output, wait_for_output};
use crate::parser::parse_report;
use crate::types::{Event, QuestionSet, UploadedDocument};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// One file part of an upload request, as received from the client
#[derive(Clone, Debug, Default)]
pub struct IncomingFile {
    /// Filename supplied by the client, possibly including a path
    pub filename: Option<String>,
    /// Declared media type of the part
    pub media_type: Option<String>,
    /// File contents
    pub bytes: Vec<u8>,
}

/// Result of a completed upload cycle
#[derive(Clone, Debug)]
pub struct UploadOutcome {
    /// The stored document
    pub document: UploadedDocument,
    /// Questions parsed from the generator output (also now cached)
    pub questions: Arc<QuestionSet>,
    /// Blocks dropped as malformed while parsing
    pub dropped_blocks: usize,
}

/// Reduce a client-supplied filename to its final path component
///
/// Both `/` and `\` count as separators. Returns `None` when nothing usable
/// remains.
///
/// ```
/// use quizgen::pipeline::sanitize_filename;
///
/// assert_eq!(sanitize_filename("../../etc/notes.pdf").as_deref(), Some("notes.pdf"));
/// assert_eq!(sanitize_filename(r"C:\docs\lecture 3.pdf").as_deref(), Some("lecture 3.pdf"));
/// assert_eq!(sanitize_filename(".."), None);
/// ```
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    match name {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

/// Check that exactly one acceptable, named, non-empty file was uploaded
///
/// Returns the file with its filename sanitised.
pub(crate) fn validate_upload(
    mut files: Vec<IncomingFile>,
    storage: &StorageConfig,
) -> std::result::Result<(String, String, Vec<u8>), ValidationError> {
    let file = match files.len() {
        0 => return Err(ValidationError::NoFile),
        1 => files.remove(0),
        count => return Err(ValidationError::TooManyFiles { count }),
    };

    let media_type = file.media_type.unwrap_or_default();
    if !storage.accepts(&media_type) {
        return Err(ValidationError::UnsupportedMediaType {
            media_type,
            accepted: storage.accepted_media_types.clone(),
        });
    }

    let filename = file
        .filename
        .as_deref()
        .and_then(sanitize_filename)
        .ok_or(ValidationError::MissingFilename)?;

    if file.bytes.is_empty() {
        return Err(ValidationError::EmptyFile { filename });
    }

    Ok((filename, media_type, file.bytes))
}

impl QuizPipeline {
    /// Run one upload through the pipeline
    ///
    /// Validates the request, stores the document, invalidates the cache,
    /// runs the generator, and parses its output into a fresh cached set.
    /// Validation failures have no side effects. Once the document is
    /// stored, any failure leaves the cache cold.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if the request is not exactly one acceptable file
    /// - [`Error::GenerationInProgress`] if another upload is running and the
    ///   policy is [`UploadPolicy::Reject`]
    /// - [`Error::Io`] if the document cannot be stored
    /// - [`Error::Generation`] or [`Error::NotSupported`] if the generator fails
    pub async fn submit_upload(&self, files: Vec<IncomingFile>) -> Result<UploadOutcome> {
        let (filename, media_type, bytes) = validate_upload(files, &self.config.storage)?;

        let _guard = match self.config.upload_policy {
            UploadPolicy::Reject => self
                .upload_lock
                .try_lock()
                .map_err(|_| Error::GenerationInProgress)?,
            UploadPolicy::Queue => self.upload_lock.lock().await,
        };

        let document = self.store_document(filename, media_type, &bytes).await?;

        self.emit_event(Event::UploadReceived {
            filename: document.filename.clone(),
            size_bytes: document.size_bytes,
        });

        let epoch = self.cache.invalidate();
        self.emit_event(Event::CacheInvalidated);
        {
            let mut state = self.cycle_state();
            state.last_document = Some(document.filename.clone());
            state.output_untrusted = true;
        }

        match self.run_cycle(&document, epoch).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                tracing::error!(
                    filename = %document.filename,
                    error = %e,
                    "Question generation failed"
                );
                self.cycle_state().last_error = Some(e.to_string());
                self.emit_event(Event::GenerationFailed {
                    filename: document.filename.clone(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn store_document(
        &self,
        filename: String,
        media_type: String,
        bytes: &[u8],
    ) -> Result<UploadedDocument> {
        let upload_dir = &self.config.storage.upload_dir;
        tokio::fs::create_dir_all(upload_dir).await?;

        let path = std::path::absolute(upload_dir.join(&filename))?;
        tokio::fs::write(&path, bytes).await?;

        tracing::info!(
            filename = %filename,
            path = %path.display(),
            size_bytes = bytes.len(),
            "Stored uploaded document"
        );

        Ok(UploadedDocument {
            path,
            filename,
            media_type,
            size_bytes: bytes.len() as u64,
        })
    }

    async fn run_cycle(&self, document: &UploadedDocument, epoch: u64) -> Result<UploadOutcome> {
        let output_path: PathBuf = self.config.storage.output_path();
        remove_stale_output(&output_path).await?;
        self.cycle_state().output_untrusted = false;

        self.emit_event(Event::GenerationStarted {
            filename: document.filename.clone(),
        });
        tracing::info!(
            filename = %document.filename,
            generator = self.generator.name(),
            "Starting question generation"
        );

        let started = Instant::now();
        let result = self.generator.generate(&document.path).await?;
        if !result.success {
            return Err(GenerationError::Failed {
                exit_code: result.exit_code,
                stderr: result.stderr,
            }
            .into());
        }

        let text = wait_for_output(&output_path, &self.config.generator).await?;
        let elapsed = started.elapsed();

        let report = parse_report(&text);
        let dropped_blocks = report.dropped_blocks;
        // The upload lock is held, so nothing else can have moved the epoch
        let questions = self
            .cache
            .populate_if(epoch, report.questions)
            .ok_or_else(|| Error::Other("question cache changed during generation".to_string()))?;

        {
            let mut state = self.cycle_state();
            state.last_generated_at = Some(chrono::Utc::now());
            state.last_error = None;
            state.dropped_blocks = dropped_blocks;
        }

        tracing::info!(
            filename = %document.filename,
            questions = questions.len(),
            dropped_blocks,
            elapsed_ms = elapsed.as_millis() as u64,
            "Question generation completed"
        );
        self.emit_event(Event::GenerationCompleted {
            filename: document.filename.clone(),
            questions: questions.len(),
            dropped_blocks,
            elapsed_ms: elapsed.as_millis() as u64,
        });

        Ok(UploadOutcome {
            document: document.clone(),
            questions,
            dropped_blocks,
        })
    }
}
