//! Core types for quizgen

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use utoipa::ToSchema;

/// A validated multiple-choice question
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuestionRecord {
    /// Question text, ordinal prefix removed
    pub question: String,
    /// Exactly four option texts, labels removed, in source order
    pub options: Vec<String>,
    /// Answer value as written by the generator (a label or an option text)
    pub answer: String,
}

impl QuestionRecord {
    /// Number of options a valid record carries
    pub const OPTION_COUNT: usize = 4;

    /// Resolve the answer to an option index
    ///
    /// Accepts a letter label (`A`-`D`, case-insensitive), a 1-based number, or
    /// the exact text of one of the options. Returns `None` when nothing matches.
    pub fn answer_index(&self) -> Option<usize> {
        let answer = self.answer.trim();

        let mut chars = answer.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            let c = c.to_ascii_lowercase();
            if ('a'..='z').contains(&c) {
                let index = (c as u8 - b'a') as usize;
                if index < self.options.len() {
                    return Some(index);
                }
            }
        }

        if let Ok(number) = answer.parse::<usize>()
            && (1..=self.options.len()).contains(&number)
        {
            return Some(number - 1);
        }

        self.options.iter().position(|option| option == answer)
    }
}

/// Ordered questions parsed from one generator output file
pub type QuestionSet = Vec<QuestionRecord>;

/// Result of parsing a generator output file
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParseReport {
    /// Questions in source order
    pub questions: QuestionSet,
    /// Non-empty blocks found in the text
    pub blocks_scanned: usize,
    /// Blocks dropped as malformed
    pub dropped_blocks: usize,
}

/// A document accepted by the upload receiver
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedDocument {
    /// Where the document was written
    pub path: PathBuf,
    /// Filename as supplied by the client (final path component only)
    pub filename: String,
    /// Declared media type
    pub media_type: String,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Outcome of one generator invocation
#[derive(Clone, Debug)]
pub struct GenerationResult {
    /// Whether the process exited with status zero
    pub success: bool,
    /// Exit code, when the process exited normally
    pub exit_code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Wall-clock time from launch to exit
    pub elapsed: Duration,
}

/// Response body for a successful upload
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    /// Human-readable confirmation
    pub message: String,
    /// Stored filename
    pub filename: String,
    /// Parsed questions
    pub questions: QuestionSet,
    /// Blocks dropped as malformed while parsing
    pub dropped_blocks: usize,
}

/// Snapshot of pipeline state for `GET /status`
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct PipelineStatus {
    /// Whether a question set is held in memory
    pub cache_warm: bool,
    /// Number of cached questions (0 when cold)
    pub cached_questions: usize,
    /// Blocks dropped by the most recent parse
    pub dropped_blocks: usize,
    /// Whether an upload is currently being processed
    pub generation_in_progress: bool,
    /// Filename of the most recent upload
    pub last_document: Option<String>,
    /// When the most recent successful generation finished
    pub last_generated_at: Option<DateTime<Utc>>,
    /// Error from the most recent failed cycle, cleared on success
    pub last_error: Option<String>,
}

/// Pipeline events broadcast to subscribers
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A document passed validation and was stored
    UploadReceived {
        /// Stored filename
        filename: String,
        /// Size in bytes
        size_bytes: u64,
    },
    /// The cached question set was dropped
    CacheInvalidated,
    /// The generator process was launched
    GenerationStarted {
        /// Stored filename
        filename: String,
    },
    /// Generation and parsing finished
    GenerationCompleted {
        /// Stored filename
        filename: String,
        /// Parsed questions
        questions: usize,
        /// Blocks dropped as malformed
        dropped_blocks: usize,
        /// Generator run time in milliseconds
        elapsed_ms: u64,
    },
    /// The cycle aborted
    GenerationFailed {
        /// Stored filename
        filename: String,
        /// Error description
        error: String,
    },
    /// A cold cache was rebuilt from the output file
    CacheRebuilt {
        /// Parsed questions
        questions: usize,
    },
}
