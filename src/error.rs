use std::io;
use std::path::PathBuf;

/// All errors produced by the devkit.
///
/// Every variant is fatal to the command that raised it. The bundle
/// generator surfaces them before its write step, so a failed run never
/// leaves a partial artifact behind.
#[derive(Debug, thiserror::Error)]
pub enum DevkitError {
    /// A source directory does not exist or is not a directory.
    #[error("source directory not found: {}", path.display())]
    MissingDirectory { path: PathBuf },

    /// Listing a directory or reading a record failed.
    #[error("cannot read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    /// A record file does not contain valid JSON.
    #[error("invalid JSON in '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Serializing generated JSON failed.
    #[error("cannot encode JSON for '{}': {source}", path.display())]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The output file could not be created, written or moved into place.
    #[error("cannot write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    /// The config file is missing, unreadable or not valid TOML.
    #[error("config error in '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// The dev server failed to bind or stopped with an I/O error.
    #[error("dev server on {addr} failed: {source}")]
    Serve { addr: String, source: io::Error },
}

pub type Result<T> = std::result::Result<T, DevkitError>;

/// Shorthand constructors.
impl DevkitError {
    pub fn missing_directory(path: impl Into<PathBuf>) -> Self {
        Self::MissingDirectory { path: path.into() }
    }

    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    pub fn encode(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Encode {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Path the error refers to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::MissingDirectory { path }
            | Self::Read { path, .. }
            | Self::Parse { path, .. }
            | Self::Encode { path, .. }
            | Self::Write { path, .. }
            | Self::Config { path, .. } => Some(path),
            Self::Serve { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_names_the_path() {
        let err = DevkitError::missing_directory("anim");
        assert_eq!(err.to_string(), "source directory not found: anim");
        assert_eq!(err.path(), Some(std::path::Path::new("anim")));
    }

    #[test]
    fn parse_error_names_the_file() {
        let source = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err = DevkitError::parse("anim/a.json", source);
        let msg = err.to_string();
        assert!(msg.starts_with("invalid JSON in 'anim/a.json'"), "{msg}");
    }

    #[test]
    fn encode_error_names_the_file() {
        let source = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let err = DevkitError::encode("anim/index.json", source);
        assert!(err.to_string().starts_with("cannot encode JSON for 'anim/index.json'"));
        assert_eq!(err.path(), Some(std::path::Path::new("anim/index.json")));
    }

    #[test]
    fn write_error_keeps_the_cause() {
        let source = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = DevkitError::write("out/anim-bundle.js", source);
        assert!(err.to_string().contains("denied"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
