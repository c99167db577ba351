//! Generator stand-in for when no executable is available

use super::traits::Generator;
use crate::types::GenerationResult;
use async_trait::async_trait;
use std::path::Path;

/// Fails every invocation with `Error::NotSupported`
///
/// Lets the service start, serve previously generated questions, and report
/// a clear error on upload when the generator is missing.
///
/// ```
/// use quizgen::generator::{Generator, UnavailableGenerator};
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() {
/// let generator = UnavailableGenerator::new("quiz-generator".to_string());
/// assert!(generator.generate(Path::new("notes.pdf")).await.is_err());
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct UnavailableGenerator {
    program: String,
}

impl UnavailableGenerator {
    /// `program` is the name that could not be found, used in the error message
    pub fn new(program: String) -> Self {
        Self { program }
    }
}

#[async_trait]
impl Generator for UnavailableGenerator {
    async fn generate(&self, _document: &Path) -> crate::Result<GenerationResult> {
        Err(crate::Error::NotSupported(format!(
            "question generation requires the '{}' executable. \
             Set generator.path in config or ensure it is in PATH.",
            self.program
        )))
    }

    fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}
