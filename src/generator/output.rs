//! Generator output file handling

use crate::config::GeneratorConfig;
use crate::error::{GenerationError, Result};
use crate::retry::retry_with_backoff;
use std::io::ErrorKind;
use std::path::Path;

/// Delete a previous run's output so it cannot be mistaken for the next one
pub async fn remove_stale_output(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Removed previous generator output");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Wait for the generator output to exist and be non-empty, then read it
///
/// Applies `settle_delay` once, then polls with the `output_wait` backoff.
/// Fails with [`GenerationError::OutputNotReady`] when polling is exhausted.
pub async fn wait_for_output(path: &Path, config: &GeneratorConfig) -> Result<String> {
    if !config.settle_delay.is_zero() {
        tokio::time::sleep(config.settle_delay).await;
    }

    retry_with_backoff(&config.output_wait, || read_ready_output(path)).await
}

async fn read_ready_output(path: &Path) -> Result<String> {
    let not_ready = || GenerationError::OutputNotReady {
        path: path.to_path_buf(),
    };

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_ready().into()),
        Err(e) => return Err(e.into()),
    };
    if bytes.is_empty() {
        return Err(not_ready().into());
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
