//! Writing the page and handing it to the browser

use crate::renderer::RenderError;
use std::path::{Path, PathBuf};

/// File written when no output path is given
pub const DEFAULT_OUTPUT_FILE: &str = "index.html";

/// Write `html` to `path`, replacing any existing file
pub fn write_output(path: &Path, html: &str) -> Result<(), RenderError> {
    std::fs::write(path, html).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), "Visualization saved");
    Ok(())
}

/// Resolve `path` against the working directory
///
/// The result is handed to the browser as a plain path; the opener builds
/// the `file://` URL itself, so characters such as `#` or `%` stay intact.
pub fn absolute_path(path: &Path) -> Result<PathBuf, RenderError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let cwd = std::env::current_dir().map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(cwd.join(path))
}

/// Open the written page in the system's default browser
pub fn open_in_browser(path: &Path) -> Result<(), RenderError> {
    let target = absolute_path(path)?;
    tracing::debug!(path = %target.display(), "opening browser");

    open::that(&target).map_err(|e| RenderError::Browser {
        path: target.clone(),
        message: e.to_string(),
    })
}
