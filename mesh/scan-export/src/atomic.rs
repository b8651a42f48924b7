//! All-or-nothing file writes.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{ExportError, ExportResult};

/// Write `bytes` to `path` atomically.
///
/// The data goes to a temporary file in the destination directory, which
/// is flushed, synced and then renamed over `path`. On failure the
/// temporary file is removed and any existing file at `path` is untouched.
///
/// # Errors
///
/// Returns [`ExportError::InvalidDestination`] if `path` has no file name,
/// or [`ExportError::Io`] if the directory is not writable or the rename
/// fails.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> ExportResult<()> {
    if path.file_name().is_none() {
        return Err(ExportError::InvalidDestination {
            path: path.to_path_buf(),
        });
    }
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path)?;
    Ok(())
}
