//! `index.json` manifests: the sorted list of record file stems in a source
//! directory, for consumers that fetch records one by one.

use std::path::{Path, PathBuf};

use crate::error::{DevkitError, Result};
use crate::record::file_stem;
use crate::scan::{self, MANIFEST_FILE_NAME};
use crate::write::write_atomic;

/// Stems written to one manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub path: PathBuf,
    pub entries: Vec<String>,
}

/// Both manifests written by [`write_manifests`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSummary {
    pub animations: Manifest,
    pub vfx: Manifest,
}

/// Sorted record stems in `dir`. Record contents are not read.
pub fn collect(dir: &Path) -> Result<Vec<String>> {
    let mut stems: Vec<String> = scan::record_files(dir)?
        .iter()
        .map(|path| file_stem(path))
        .collect();
    stems.sort();
    Ok(stems)
}

/// Write `<dir>/index.json` and return what it lists.
pub fn write_manifest(dir: &Path) -> Result<Manifest> {
    let entries = collect(dir)?;
    let path = dir.join(MANIFEST_FILE_NAME);
    let mut json = serde_json::to_string_pretty(&entries).map_err(|e| DevkitError::encode(&path, e))?;
    json.push('\n');
    write_atomic(&path, json.as_bytes())?;
    tracing::info!(manifest = %path.display(), entries = entries.len(), "manifest written");
    Ok(Manifest { path, entries })
}

/// Write the manifests of both source directories.
///
/// Both directories must exist; neither manifest is written otherwise.
pub fn write_manifests(anim_dir: &Path, vfx_dir: &Path) -> Result<ManifestSummary> {
    // listing both first surfaces a missing directory before any write
    collect(anim_dir)?;
    collect(vfx_dir)?;

    Ok(ManifestSummary {
        animations: write_manifest(anim_dir)?,
        vfx: write_manifest(vfx_dir)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn lists_sorted_stems_ignoring_ids() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("walk.json"), r#"{"id":"player_walk"}"#).unwrap();
        fs::write(dir.path().join("idle.json"), "{}").unwrap();
        fs::write(dir.path().join("index.json"), r#"["stale"]"#).unwrap();

        let manifest = write_manifest(dir.path()).unwrap();
        assert_eq!(manifest.entries, ["idle", "walk"]);

        let written = fs::read_to_string(dir.path().join("index.json")).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, ["idle", "walk"]);
    }

    #[test]
    fn rewriting_does_not_list_itself() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("slash.json"), "{}").unwrap();
        write_manifest(dir.path()).unwrap();
        let second = write_manifest(dir.path()).unwrap();
        assert_eq!(second.entries, ["slash"]);
    }

    #[test]
    fn missing_vfx_dir_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let anim = dir.path().join("anim");
        fs::create_dir(&anim).unwrap();
        fs::write(anim.join("idle.json"), "{}").unwrap();

        assert!(write_manifests(&anim, &dir.path().join("vfx")).is_err());
        assert!(!anim.join("index.json").exists());
    }
}
