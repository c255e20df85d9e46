//! yyport Core Library
//!
//! This crate converts an extracted GameMaker data file into a GameMaker
//! Studio 2.3 project:
//! - Name sanitizing and the run-scoped identity registry
//! - Reference resolution with forward allocation
//! - Per-kind converters writing `.yy` descriptors and assets
//! - Manifest assembly with referential closure
//! - Source access through the `SourceData` trait (in memory or dump directory)

pub mod convert;
pub mod error;
pub mod manifest;
pub mod output;
pub mod path_utils;
pub mod registry;
pub mod report;
pub mod resolve;
pub mod sanitize;
pub mod source;
pub mod types;

// Re-export commonly used types
pub use convert::{convert_project, ConversionOutcome};
pub use error::ConvertError;
pub use manifest::{Manifest, ManifestAssembler, SyntheticReason, SyntheticResource};
pub use output::OutputTree;
pub use registry::Registry;
pub use report::{ConversionReport, ManualStep, SkippedResource};
pub use sanitize::sanitize;
pub use source::{
    BlobRef, CodeOwner, DumpSource, MemorySource, SourceData, SourceError, SourceGraph,
    TextureHandle,
};
pub use types::{
    ConfigError, ConvertConfig, Identity, ResourceRef, SourceHandle, SourceKind, TargetKind,
};
pub use path_utils::{normalize_path, path_to_string, sanitize_filename};
