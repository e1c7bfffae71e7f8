//! Devkit configuration.
//!
//! An optional `ddoo.toml` in the working directory overrides the built-in
//! defaults, and CLI flags override both. Every field has a default, so a
//! missing file or a partial file is always valid.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DevkitError, Result};
use crate::record::RecordKind;

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "ddoo.toml";

/// Top-level config, deserialized from `ddoo.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevkitConfig {
    #[serde(default)]
    pub bundle: BundleConfig,

    #[serde(default)]
    pub serve: ServeConfig,
}

/// `[bundle]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Directory holding animation records.
    #[serde(default = "default_anim_dir")]
    pub anim_dir: PathBuf,

    /// Directory holding VFX records.
    #[serde(default = "default_vfx_dir")]
    pub vfx_dir: PathBuf,

    /// Generated artifact path.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default)]
    pub artifact: ArtifactOptions,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            anim_dir: default_anim_dir(),
            vfx_dir: default_vfx_dir(),
            output: default_output(),
            artifact: ArtifactOptions::default(),
        }
    }
}

fn default_anim_dir() -> PathBuf {
    RecordKind::Animation.default_dir().into()
}
fn default_vfx_dir() -> PathBuf {
    RecordKind::Vfx.default_dir().into()
}
fn default_output() -> PathBuf {
    "anim-bundle.js".into()
}

/// `[bundle.artifact]` section: names used inside the generated script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactOptions {
    /// Global binding holding the animation index.
    #[serde(default = "default_anim_binding")]
    pub anim_binding: String,

    /// Global binding holding the VFX index.
    #[serde(default = "default_vfx_binding")]
    pub vfx_binding: String,

    /// Global function that copies both indices into a registry.
    #[serde(default = "default_hook_name")]
    pub hook_name: String,

    /// Global registry the artifact registers into on load.
    #[serde(default = "default_registry")]
    pub registry: String,

    /// Collection on the registry receiving animation entries.
    #[serde(default = "default_anim_cache")]
    pub anim_cache: String,

    /// Collection on the registry receiving VFX entries.
    #[serde(default = "default_vfx_cache")]
    pub vfx_cache: String,

    /// Emit the guarded block that calls the hook when `registry` exists.
    #[serde(default = "default_true")]
    pub auto_register: bool,
}

impl Default for ArtifactOptions {
    fn default() -> Self {
        Self {
            anim_binding: default_anim_binding(),
            vfx_binding: default_vfx_binding(),
            hook_name: default_hook_name(),
            registry: default_registry(),
            anim_cache: default_anim_cache(),
            vfx_cache: default_vfx_cache(),
            auto_register: true,
        }
    }
}

fn default_anim_binding() -> String {
    "ANIM_BUNDLE".into()
}
fn default_vfx_binding() -> String {
    "VFX_BUNDLE".into()
}
fn default_hook_name() -> String {
    "registerAnimBundle".into()
}
fn default_registry() -> String {
    "DDOOAction".into()
}
fn default_anim_cache() -> String {
    "animCache".into()
}
fn default_vfx_cache() -> String {
    "vfxCache".into()
}
fn default_true() -> bool {
    true
}

/// `[serve]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServeConfig {
    /// Directory served at `/`.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Interface to bind. `0.0.0.0` makes the server reachable from the LAN.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_root() -> PathBuf {
    ".".into()
}
fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}

impl DevkitConfig {
    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_required(path)
    }

    /// Load `path`, which must exist.
    pub fn load_required(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DevkitError::config(path, "file not found"),
            _ => DevkitError::config(path, e.to_string()),
        })?;
        let config = Self::parse(&text).map_err(|e| DevkitError::config(path, e))?;
        tracing::debug!(?path, "loaded config file");
        Ok(config)
    }

    /// Load an explicitly named file, or `ddoo.toml` in the working
    /// directory when none was given. Only the implicit file may be absent.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_required(path),
            None => Self::load(Path::new(CONFIG_FILE_NAME)),
        }
    }

    /// Load `ddoo.toml` from `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load(&dir.join(CONFIG_FILE_NAME))
    }

    /// Parse a TOML document.
    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        toml::from_str(text).map_err(|e| e.message().to_string())
    }
}
