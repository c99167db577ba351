//! Question generator invocation
//!
//! The generator is an external program that turns a document into a flat
//! text file of questions. It is driven through the [`Generator`] trait:
//!
//! - [`CliGenerator`]: runs an external executable with the document path
//! - [`UnavailableGenerator`]: stand-in when no executable is configured or found
//!
//! After a successful run, [`wait_for_output`] polls for the output file with
//! bounded backoff instead of trusting a fixed delay.
//!
//! ## Usage
//!
//! ```no_run
//! use quizgen::generator::{CliGenerator, Generator};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let generator = CliGenerator::from_path("quiz-generator")
//!         .expect("quiz-generator not found");
//!
//!     let result = generator.generate(Path::new("uploads/notes.pdf")).await?;
//!     println!("generator finished in {:?}", result.elapsed);
//!     Ok(())
//! }
//! ```

mod cli;
mod output;
mod traits;
mod unavailable;

pub use cli::CliGenerator;
pub use output::{remove_stale_output, wait_for_output};
pub use traits::Generator;
pub use unavailable::UnavailableGenerator;

use crate::config::GeneratorConfig;
use std::path::Path;
use std::sync::Arc;

/// Pick the generator implementation described by `config`
///
/// An explicit `path` wins; otherwise `program` is searched for in PATH when
/// `search_path` is set. Falls back to [`UnavailableGenerator`].
pub fn from_config(config: &GeneratorConfig, work_dir: &Path) -> Arc<dyn Generator> {
    let cli = if let Some(ref path) = config.path {
        Some(CliGenerator::new(path.clone()))
    } else if config.search_path {
        CliGenerator::from_path(&config.program)
    } else {
        None
    };

    let generator: Arc<dyn Generator> = match cli {
        Some(cli) => Arc::new(
            cli.with_args(config.args.clone())
                .with_work_dir(work_dir.to_path_buf()),
        ),
        None => Arc::new(UnavailableGenerator::new(config.program.clone())),
    };

    tracing::info!(
        generator = generator.name(),
        available = generator.is_available(),
        "Question generator initialized"
    );

    generator
}
