pub mod bundle;
pub mod config;
pub mod error;
pub mod index;
pub mod manifest;
pub mod record;
pub mod scan;
pub mod server;

mod write;

pub use bundle::{
    generate, generate_at, generate_with, load_bundle, Bundle, BundleRegistry, BundleSummary,
    MemoryRegistry,
};
pub use config::{ArtifactOptions, BundleConfig, DevkitConfig, ServeConfig};
pub use error::{DevkitError, Result};
pub use index::RecordIndex;
pub use manifest::{write_manifests, ManifestSummary};
pub use record::{Record, RecordKind};
