use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{DevkitError, Result};

/// Replace `path` with `contents` in one step.
///
/// The data goes to a temporary file next to `path` first and is renamed
/// over it only once fully written, so readers see either the old file or
/// the new one. An existing file's permissions carry over.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| DevkitError::write(path, e))?;
    tmp.write_all(contents).map_err(|e| DevkitError::write(path, e))?;
    tmp.as_file().sync_all().map_err(|e| DevkitError::write(path, e))?;

    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| DevkitError::write(path, e))?;
    }

    tmp.persist(path).map_err(|e| DevkitError::write(path, e.error))?;
    Ok(())
}
