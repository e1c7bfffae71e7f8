//! Animation/VFX bundle generation.
//!
//! Scans the animation and VFX source directories, indexes every record by
//! identifier and writes a single script that exposes both indices to the
//! game without any per-file fetches. Everything is loaded and rendered in
//! memory before the output is touched, so a failed run leaves the previous
//! bundle in place.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;

use crate::config::{ArtifactOptions, BundleConfig};
use crate::error::{DevkitError, Result};
use crate::index::RecordIndex;
use crate::record::{Record, RecordKind};
use crate::scan;
use crate::write::write_atomic;

pub mod artifact;

/// Both indices of one generator run.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    pub animations: RecordIndex,
    pub vfx: RecordIndex,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSummary {
    pub output: PathBuf,
    pub animations: usize,
    pub vfx: usize,
}

/// Receives bundle entries after load.
///
/// This is the Rust side of the artifact's registration hook: an embedding
/// application hands its caches to [`Bundle::register_into`] explicitly.
pub trait BundleRegistry {
    fn register(&mut self, kind: RecordKind, id: &str, data: &Value);
}

/// Registry with one ordered cache per record kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryRegistry {
    pub anim_cache: IndexMap<String, Value>,
    pub vfx_cache: IndexMap<String, Value>,
}

impl BundleRegistry for MemoryRegistry {
    fn register(&mut self, kind: RecordKind, id: &str, data: &Value) {
        let cache = match kind {
            RecordKind::Animation => &mut self.anim_cache,
            RecordKind::Vfx => &mut self.vfx_cache,
        };
        cache.insert(id.to_string(), data.clone());
    }
}

impl Bundle {
    pub fn new() -> Self {
        Self {
            animations: RecordIndex::new(RecordKind::Animation),
            vfx: RecordIndex::new(RecordKind::Vfx),
        }
    }

    pub fn index(&self, kind: RecordKind) -> &RecordIndex {
        match kind {
            RecordKind::Animation => &self.animations,
            RecordKind::Vfx => &self.vfx,
        }
    }

    fn index_mut(&mut self, kind: RecordKind) -> &mut RecordIndex {
        match kind {
            RecordKind::Animation => &mut self.animations,
            RecordKind::Vfx => &mut self.vfx,
        }
    }

    /// Copy every entry into `registry`, animations first.
    ///
    /// Returns `(animations, vfx)` counts copied.
    pub fn register_into<R: BundleRegistry + ?Sized>(&self, registry: &mut R) -> (usize, usize) {
        for kind in [RecordKind::Animation, RecordKind::Vfx] {
            for (id, data) in self.index(kind).iter() {
                registry.register(kind, id, data);
            }
        }
        (self.animations.len(), self.vfx.len())
    }
}

impl Default for Bundle {
    fn default() -> Self {
        Self::new()
    }
}

/// Load every record of one kind from `dir` into `bundle`.
fn load_kind(bundle: &mut Bundle, kind: RecordKind, dir: &Path) -> Result<()> {
    let files = scan::record_files(dir)?;
    tracing::info!(kind = %kind, dir = %dir.display(), files = files.len(), "loading records");

    for path in files {
        let record = Record::load(&path)?;
        let id = record.id.clone();
        if bundle.index_mut(kind).insert(record).is_some() {
            tracing::debug!(kind = %kind, %id, file = %path.display(), "identifier overwritten by later file");
        }
        tracing::info!(kind = %kind, %id, "loaded");
    }
    Ok(())
}

/// Scan and load both source directories.
///
/// Both directories are checked before any record is parsed, so a missing
/// VFX directory is reported without reading the animations first.
pub fn load_bundle(anim_dir: &Path, vfx_dir: &Path) -> Result<Bundle> {
    for dir in [anim_dir, vfx_dir] {
        if !dir.is_dir() {
            return Err(DevkitError::missing_directory(dir));
        }
    }

    let mut bundle = Bundle::new();
    load_kind(&mut bundle, RecordKind::Animation, anim_dir)?;
    load_kind(&mut bundle, RecordKind::Vfx, vfx_dir)?;
    Ok(bundle)
}

/// Generate the bundle with default artifact names.
pub fn generate(anim_dir: &Path, vfx_dir: &Path, output: &Path) -> Result<BundleSummary> {
    generate_at(anim_dir, vfx_dir, output, &ArtifactOptions::default(), Utc::now())
}

/// Generate the bundle described by `config`.
pub fn generate_with(config: &BundleConfig) -> Result<BundleSummary> {
    generate_at(
        &config.anim_dir,
        &config.vfx_dir,
        &config.output,
        &config.artifact,
        Utc::now(),
    )
}

/// Generate the bundle stamped with `generated_at`.
pub fn generate_at(
    anim_dir: &Path,
    vfx_dir: &Path,
    output: &Path,
    options: &ArtifactOptions,
    generated_at: DateTime<Utc>,
) -> Result<BundleSummary> {
    let bundle = load_bundle(anim_dir, vfx_dir)?;
    let script =
        artifact::render(&bundle, options, generated_at).map_err(|e| DevkitError::encode(output, e))?;
    write_atomic(output, script.as_bytes())?;

    let summary = BundleSummary {
        output: output.to_path_buf(),
        animations: bundle.animations.len(),
        vfx: bundle.vfx.len(),
    };
    tracing::info!(
        output = %output.display(),
        animations = summary.animations,
        vfx = summary.vfx,
        bytes = script.len(),
        "bundle written"
    );
    Ok(summary)
}
