//! Animation and VFX records: one JSON document per file.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{DevkitError, Result};

/// Extension every record file carries.
pub const RECORD_EXTENSION: &str = ".json";

/// Which namespace a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Animation,
    Vfx,
}

impl RecordKind {
    /// Source directory name relative to the game root.
    pub fn default_dir(self) -> &'static str {
        match self {
            Self::Animation => "anim",
            Self::Vfx => "vfx",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Animation => "animation",
            Self::Vfx => "vfx",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A loaded record, keyed by its resolved identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub source: PathBuf,
    pub data: Value,
}

impl Record {
    /// Read and parse `path`, then resolve its identifier.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| DevkitError::read(path, e))?;
        let data: Value = serde_json::from_str(&text).map_err(|e| DevkitError::parse(path, e))?;
        let id = resolve_id(&data, path);
        Ok(Self {
            id,
            source: path.to_path_buf(),
            data,
        })
    }
}

/// File name with the `.json` suffix removed.
///
/// Only the trailing suffix is stripped, so `fx.json.json` yields `fx.json`.
pub fn file_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    name.strip_suffix(RECORD_EXTENSION)
        .unwrap_or(name.as_ref())
        .to_string()
}

/// The document's `id` when it is a non-empty string, else the file stem.
pub fn resolve_id(data: &Value, path: &Path) -> String {
    match data.get("id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::String(_)) | Some(Value::Null) | None => file_stem(path),
        Some(other) => {
            let stem = file_stem(path);
            tracing::warn!(
                file = %path.display(),
                id = %other,
                "non-string id ignored, using file name"
            );
            stem
        }
    }
}
