//! Common utilities for quizgen end-to-end tests

#![allow(dead_code)]

use quizgen::config::RetryConfig;
use quizgen::{Config, Event, IncomingFile, QuizPipeline, UploadPolicy};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

/// Generator output for a two-question document
pub const LECTURE_OUTPUT: &str = "\
Here are your questions.

1. Which gas do plants absorb during photosynthesis?
Options:
A. Oxygen
B. Carbon dioxide
C. Nitrogen
D. Helium
(Answer: B)
----------------------------
2. What is the powerhouse of the cell?
Options:
A. Nucleus
B. Ribosome
C. Mitochondria
D. Golgi apparatus
(Answer: C)
----------------------------
";

/// Pipeline whose generator is `sh -c <script>`
///
/// The script runs in the temp dir with the document path as `$1` and must
/// write `generated_questions.txt` itself.
pub async fn shell_pipeline(script: &str, policy: UploadPolicy) -> (QuizPipeline, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = shell_config(dir.path(), script, policy);
    let pipeline = QuizPipeline::new(config).await.unwrap();
    (pipeline, dir)
}

pub fn shell_config(dir: &Path, script: &str, policy: UploadPolicy) -> Config {
    let mut config = Config::default();
    config.storage.upload_dir = dir.join("uploads");
    config.storage.work_dir = dir.to_path_buf();
    config.upload_policy = policy;
    config.generator.path = Some("/bin/sh".into());
    config.generator.args = vec!["-c".to_string(), script.to_string(), "generator".to_string()];
    config.generator.output_wait = RetryConfig {
        max_attempts: 5,
        initial_delay: Duration::from_millis(20),
        max_delay: Duration::from_millis(100),
        backoff_multiplier: 2.0,
        jitter: false,
    };
    config
}

/// A single PDF part whose bytes are `contents`
pub fn pdf(filename: &str, contents: &str) -> Vec<IncomingFile> {
    vec![IncomingFile {
        filename: Some(filename.to_string()),
        media_type: Some("application/pdf".to_string()),
        bytes: contents.as_bytes().to_vec(),
    }]
}

/// Drain every event currently buffered on `rx`
pub fn drain(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
