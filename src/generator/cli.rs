//! Generator backed by an external executable

use super::traits::Generator;
use crate::error::GenerationError;
use crate::types::GenerationResult;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;

/// Runs `<binary> [args...] <document>` and captures its output
///
/// # Examples
///
/// ```no_run
/// use quizgen::generator::{CliGenerator, Generator};
/// use std::path::{Path, PathBuf};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let generator = CliGenerator::new(PathBuf::from("/usr/local/bin/quiz-generator"))
///     .with_work_dir(PathBuf::from("/srv/quiz"));
///
/// let result = generator.generate(Path::new("/srv/quiz/uploads/notes.pdf")).await?;
/// assert!(result.success);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CliGenerator {
    binary_path: PathBuf,
    args: Vec<String>,
    work_dir: Option<PathBuf>,
}

impl CliGenerator {
    /// Create a generator for an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self {
            binary_path,
            args: Vec::new(),
            work_dir: None,
        }
    }

    /// Find `program` in PATH
    pub fn from_path(program: &str) -> Option<Self> {
        which::which(program).ok().map(Self::new)
    }

    /// Fixed arguments placed before the document path
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Directory the generator runs in (it writes its output relative to this)
    pub fn with_work_dir(mut self, work_dir: PathBuf) -> Self {
        self.work_dir = Some(work_dir);
        self
    }

    /// The executable this generator runs
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }
}

#[async_trait]
impl Generator for CliGenerator {
    async fn generate(&self, document: &Path) -> crate::Result<GenerationResult> {
        let mut command = Command::new(&self.binary_path);
        command
            .args(&self.args)
            .arg(document)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(ref work_dir) = self.work_dir {
            command.current_dir(work_dir);
        }

        tracing::debug!(
            binary = %self.binary_path.display(),
            document = %document.display(),
            "Launching question generator"
        );

        let started = Instant::now();
        let output = command.output().await.map_err(|e| GenerationError::Launch {
            program: self.binary_path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(GenerationResult {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            elapsed: started.elapsed(),
        })
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "cli"
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn from_path_agrees_with_which() {
        assert_eq!(
            which::which("sh").is_ok(),
            CliGenerator::from_path("sh").is_some()
        );
        assert!(CliGenerator::from_path("nonexistent-quiz-generator-xyz").is_none());
    }

    #[tokio::test]
    async fn launch_failure_is_reported_with_program() {
        let generator = CliGenerator::new(PathBuf::from("/nonexistent/path/to/generator"));

        let err = generator.generate(Path::new("doc.pdf")).await.unwrap_err();

        match err {
            Error::Generation(GenerationError::Launch { program, .. }) => {
                assert_eq!(program, "/nonexistent/path/to/generator");
            }
            other => panic!("expected launch error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn document_path_is_the_last_argument() {
        let dir = tempfile::tempdir().unwrap();
        let generator = CliGenerator::new(PathBuf::from("sh"))
            .with_args(vec![
                "-c".to_string(),
                r#"printf '%s' "$1" > seen.txt"#.to_string(),
                "generator".to_string(),
            ])
            .with_work_dir(dir.path().to_path_buf());

        let result = generator
            .generate(Path::new("uploads/notes.pdf"))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        let seen = std::fs::read_to_string(dir.path().join("seen.txt")).unwrap();
        assert_eq!(seen, "uploads/notes.pdf");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_captures_stderr() {
        let generator = CliGenerator::new(PathBuf::from("sh")).with_args(vec![
            "-c".to_string(),
            "echo working; echo 'no text layer' >&2; exit 3".to_string(),
            "generator".to_string(),
        ]);

        let result = generator.generate(Path::new("scan.pdf")).await.unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.stdout.trim(), "working");
        assert_eq!(result.stderr.trim(), "no text layer");
    }
}
