//! Application state for the API server

use crate::{Config, QuizPipeline};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clone).
#[derive(Clone)]
pub struct AppState {
    /// The pipeline serving uploads and questions
    pub pipeline: Arc<QuizPipeline>,

    /// Configuration (read-only)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(pipeline: Arc<QuizPipeline>, config: Arc<Config>) -> Self {
        Self { pipeline, config }
    }
}
