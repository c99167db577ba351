//! Shared fixtures for pipeline and API tests

use super::{IncomingFile, QuizPipeline};
use crate::config::{Config, RetryConfig, UploadPolicy};
use crate::generator::Generator;
use crate::types::GenerationResult;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Notify;

pub(crate) const TWO_QUESTIONS: &str = "\
1. What is 2+2?
Options:
A. 3
B. 4
C. 5
D. 6
(Answer: B)
----------------------------
2. Which planet is known as the Red Planet?
Options:
A. Venus
B. Mars
C. Jupiter
D. Saturn
(Answer: B)
----------------------------
";

pub(crate) const ONE_QUESTION: &str = "\
1. What is the capital of France?
Options:
A. Berlin
B. Madrid
C. Paris
D. Rome
(Answer: C)
----------------------------
";

/// What a [`ScriptedGenerator`] does on one invocation
#[derive(Clone, Debug)]
pub(crate) enum Script {
    /// Write this text to the output file and exit 0
    Write(String),
    /// Exit non-zero with this stderr, writing nothing
    Fail { exit_code: i32, stderr: String },
    /// Exit 0 without writing anything
    NoOutput,
}

/// In-process generator that plays back scripted runs
///
/// When a gate is installed, each run signals `started` and then waits for
/// `release` before doing its work.
pub(crate) struct ScriptedGenerator {
    output_path: PathBuf,
    scripts: Mutex<VecDeque<Script>>,
    calls: AtomicUsize,
    documents: Mutex<Vec<PathBuf>>,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl ScriptedGenerator {
    pub(crate) fn new(output_path: PathBuf, scripts: Vec<Script>) -> Self {
        Self {
            output_path,
            scripts: Mutex::new(scripts.into()),
            calls: AtomicUsize::new(0),
            documents: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Returns `(started, release)`
    pub(crate) fn gated(mut self) -> (Self, Arc<Notify>, Arc<Notify>) {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        self.gate = Some((started.clone(), release.clone()));
        (self, started, release)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn documents(&self) -> Vec<PathBuf> {
        self.documents.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, document: &Path) -> crate::Result<GenerationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.documents.lock().unwrap().push(document.to_path_buf());

        if let Some((started, release)) = &self.gate {
            started.notify_one();
            release.notified().await;
        }

        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Script::NoOutput);

        let (success, exit_code, stderr) = match script {
            Script::Write(text) => {
                tokio::fs::write(&self.output_path, text).await?;
                (true, 0, String::new())
            }
            Script::Fail { exit_code, stderr } => (false, exit_code, stderr),
            Script::NoOutput => (true, 0, String::new()),
        };

        Ok(GenerationResult {
            success,
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr,
            elapsed: Duration::from_millis(1),
        })
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Config rooted in a temp dir, with output polling kept short
pub(crate) fn test_config(dir: &Path, policy: UploadPolicy) -> Config {
    let mut config = Config::default();
    config.storage.upload_dir = dir.join("uploads");
    config.storage.work_dir = dir.to_path_buf();
    config.upload_policy = policy;
    config.generator.output_wait = RetryConfig {
        max_attempts: 3,
        initial_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(10),
        backoff_multiplier: 2.0,
        jitter: false,
    };
    config
}

/// Pipeline in a fresh temp dir driven by `scripts`
pub(crate) async fn create_test_pipeline(
    scripts: Vec<Script>,
) -> (QuizPipeline, Arc<ScriptedGenerator>, TempDir) {
    create_test_pipeline_with_policy(scripts, UploadPolicy::Reject).await
}

pub(crate) async fn create_test_pipeline_with_policy(
    scripts: Vec<Script>,
    policy: UploadPolicy,
) -> (QuizPipeline, Arc<ScriptedGenerator>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), policy);
    let generator = Arc::new(ScriptedGenerator::new(
        config.storage.output_path(),
        scripts,
    ));
    let pipeline = QuizPipeline::with_generator(config, generator.clone())
        .await
        .unwrap();
    (pipeline, generator, dir)
}

pub(crate) fn pdf_upload(filename: &str) -> Vec<IncomingFile> {
    vec![IncomingFile {
        filename: Some(filename.to_string()),
        media_type: Some("application/pdf".to_string()),
        bytes: b"%PDF-1.4 test document".to_vec(),
    }]
}
