//! Writes the rendered page to disk.
//!
//! The page is rendered completely in memory before this module is called,
//! so a run that fails earlier never touches the previous output.

use std::path::Path;

use tokio::fs;
use tracing::{error, info, instrument};

use crate::errors::AppError;

/// Overwrite `path` with `html` (UTF-8) in a single write.
///
/// # Errors
///
/// Returns [`AppError::Output`] if the file cannot be written.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_page(path: &Path, html: &str) -> Result<(), AppError> {
    info!(bytes = html.len(), "Writing page");
    if let Err(source) = fs::write(path, html.as_bytes()).await {
        error!(error = %source, "Failed writing page");
        return Err(AppError::Output {
            path: path.to_path_buf(),
            source,
        });
    }
    info!("Wrote page");
    Ok(())
}
