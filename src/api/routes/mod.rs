//! Route handlers for the REST API
//!
//! - [`quiz`] - Document upload and question retrieval
//! - [`system`] - Health, status, OpenAPI, events

mod quiz;
mod system;

// Re-export all handlers so `routes::function_name` works
pub use quiz::*;
pub use system::*;
