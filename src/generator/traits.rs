//! Generator trait

use crate::types::GenerationResult;
use async_trait::async_trait;
use std::path::Path;

/// Turns a stored document into the generator output file
///
/// Implementations run to completion without a timeout. A non-zero exit is
/// reported through [`GenerationResult::success`], not as an `Err`; `Err` is
/// reserved for failing to run at all.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Run the generator against `document`
    ///
    /// # Errors
    ///
    /// Returns an error if the generator cannot be launched or is not
    /// available.
    async fn generate(&self, document: &Path) -> crate::Result<GenerationResult>;

    /// Whether this implementation can run at all
    fn is_available(&self) -> bool;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
