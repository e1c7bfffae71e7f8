//! Source directory scanning.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DevkitError, Result};
use crate::record::RECORD_EXTENSION;

/// Reserved manifest name; never loaded as a record.
pub const MANIFEST_FILE_NAME: &str = "index.json";

/// List record files in `dir`, sorted by file name.
///
/// Keeps regular files whose name ends in `.json`, except `index.json`.
/// Names are compared bytewise, so uppercase sorts before lowercase.
pub fn record_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(DevkitError::missing_directory(dir));
    }

    let mut files: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| DevkitError::read(dir, e))? {
        let entry = entry.map_err(|e| DevkitError::read(dir, e))?;
        let path = entry.path();

        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            tracing::warn!(file = %path.display(), "skipping file with non UTF-8 name");
            continue;
        };
        if !is_record_name(&name) {
            continue;
        }
        // follows symlinks, so a linked record still counts
        if !path.is_file() {
            tracing::debug!(file = %path.display(), "skipping non-file entry");
            continue;
        }
        files.push((name, path));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files.into_iter().map(|(_, path)| path).collect())
}

/// Whether a file name is a candidate record.
pub fn is_record_name(name: &str) -> bool {
    name.ends_with(RECORD_EXTENSION) && name != MANIFEST_FILE_NAME
}
