//! Fatal conversion errors
//!
//! Anything in here aborts the whole run. Per-resource failures never reach
//! this type; they are logged and recorded in the report instead.

use std::path::PathBuf;

use crate::source::SourceError;
use crate::types::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Output directory {0} already exists and is not empty")]
    OutputNotEmpty(PathBuf),

    #[error("Failed to remove existing output {path}: {source}")]
    RemoveExisting {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output directory {path}: {source}")]
    CreateRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write project manifest {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write synthetic resource {path}: {source}")]
    SyntheticWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
