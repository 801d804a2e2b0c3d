//! Snapshot loading errors.

use std::path::PathBuf;

use thiserror::Error;

/// Error returned when a [`CssConfig`](super::CssConfig) snapshot cannot be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The snapshot file could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The snapshot is not valid JSON for the expected shape.
    #[error("invalid JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),
    /// The snapshot is not valid YAML for the expected shape.
    #[error("invalid YAML snapshot: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The file extension does not name a supported format.
    #[error("unsupported snapshot format '{}' (expected .json, .yaml or .yml)", .0.display())]
    UnknownFormat(PathBuf),
}
