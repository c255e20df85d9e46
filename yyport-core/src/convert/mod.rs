//! Conversion pipeline
//!
//! One [`Converter`] carries the run-scoped state (registry, manifest,
//! output tree, report) through every per-kind phase. Phases run groups
//! first, then media, then logic, then rooms; the resolver makes the order
//! irrelevant to reference correctness.
//!
//! A failure inside one resource is logged and recorded as skipped; only
//! output root and manifest I/O abort the run.

mod code;
mod extensions;
mod fonts;
mod groups;
mod included;
mod objects;
mod paths;
mod rooms;
mod scripts;
mod shaders;
mod sounds;
mod sprites;
mod tilesets;
mod timelines;

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

pub use code::{incompatibility_header, CodeScanner};
pub use objects::event_file_stem;
pub use sprites::ConversionInput;

use crate::error::ConvertError;
use crate::manifest::{Manifest, ManifestAssembler, SyntheticReason, SyntheticResource};
use crate::output::OutputTree;
use crate::registry::Registry;
use crate::report::ConversionReport;
use crate::sanitize::sanitize;
use crate::source::{SourceData, SourceGraph};
use crate::types::{
    resource_path, ConvertConfig, Identity, ResourceHeader, SourceHandle, SourceKind, TargetKind,
    MANIFEST_EXTENSION,
};

/// Tag carried by descriptors the assembler wrote for unconverted targets
pub const PLACEHOLDER_TAG: &str = "yyport:placeholder";

/// Result of a completed run
#[derive(Debug)]
pub struct ConversionOutcome {
    pub manifest: Manifest,
    pub report: ConversionReport,
    /// Absolute path of the written `.yyp`
    pub manifest_path: PathBuf,
    /// Every path created during the run
    pub created: Vec<PathBuf>,
}

/// Run-scoped conversion context
pub struct Converter<'a> {
    source: &'a dyn SourceData,
    config: &'a ConvertConfig,
    registry: Registry,
    manifest: ManifestAssembler,
    output: OutputTree,
    report: ConversionReport,
    scanner: CodeScanner,
}

/// Descriptor written for a referenced resource that was never converted
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaceholderDocument {
    #[serde(flatten)]
    header: ResourceHeader,
}

/// Convert a whole source project into `output`.
///
/// `output` must already be prepared; see [`OutputTree::prepare`].
pub fn convert_project(
    source: &dyn SourceData,
    config: &ConvertConfig,
    output: OutputTree,
) -> Result<ConversionOutcome, ConvertError> {
    let project_name = project_name(config, source.graph());
    tracing::info!(
        "Converting project {} into {}",
        project_name,
        output.root().display()
    );

    let mut converter = Converter::new(source, config, output);
    converter.convert_groups();
    converter.convert_sprites();
    converter.convert_sounds();
    converter.convert_tilesets();
    converter.convert_fonts();
    converter.convert_paths();
    converter.convert_scripts();
    converter.convert_shaders();
    converter.convert_timelines();
    converter.convert_objects();
    converter.convert_rooms();
    converter.convert_included_files();
    converter.convert_extensions();

    converter.finish(&project_name)
}

/// Project name: configured override, else the source game name, else "Project"
pub fn project_name(config: &ConvertConfig, graph: &SourceGraph) -> String {
    config
        .project_name
        .as_deref()
        .or(graph.name.as_deref())
        .filter(|name| !name.trim().is_empty())
        .map(sanitize)
        .unwrap_or_else(|| "Project".to_string())
}

impl<'a> Converter<'a> {
    pub fn new(source: &'a dyn SourceData, config: &'a ConvertConfig, output: OutputTree) -> Self {
        Self {
            source,
            config,
            registry: Registry::new(),
            manifest: ManifestAssembler::new(),
            output,
            report: ConversionReport::default(),
            scanner: CodeScanner::new(&config.code.incompatible_functions),
        }
    }

    fn graph(&self) -> &'a SourceGraph {
        self.source.graph()
    }

    /// Run every resource of one source kind through `convert`.
    ///
    /// Resources without a usable name are skipped before any identity is
    /// allocated for them.
    fn run_phase(
        &mut self,
        target: TargetKind,
        kind: SourceKind,
        convert: fn(&mut Converter<'a>, usize, &Identity) -> Result<()>,
    ) {
        let graph = self.graph();
        let count = graph.count(kind);
        tracing::info!("Converting {} {}...", count, target.display_name());

        for index in 0..count {
            let handle = SourceHandle::new(kind, index);
            let Some(identity) = self.registry.identity_for(graph, target, handle) else {
                tracing::warn!("Skipping {}: it has no usable name", handle);
                self.report
                    .record_skipped(target, &handle.to_string(), "missing name".to_string());
                continue;
            };
            self.isolate(target, &identity.name, |c| convert(c, index, &identity));
        }
    }

    /// Run one resource body; an error skips the resource and never propagates
    fn isolate<F>(&mut self, kind: TargetKind, name: &str, body: F)
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        tracing::debug!("Converting {} {}", kind, name);
        if let Err(err) = body(self) {
            tracing::warn!("Skipping {} {}: {:#}", kind, name, err);
            self.report.record_skipped(kind, name, format!("{:#}", err));
        }
    }

    /// Write a resource's `.yy` document at its standard path
    fn write_descriptor<T: Serialize>(
        &mut self,
        kind: TargetKind,
        name: &str,
        document: &T,
    ) -> Result<()> {
        let rel = resource_path(kind, name);
        self.output
            .write_json(&rel, document)
            .with_context(|| format!("Failed to write {}", rel))
    }

    /// Add a converted resource to the manifest
    fn register(&mut self, kind: TargetKind, identity: &Identity) {
        if self.manifest.add_identity(kind, identity) {
            self.report.record_converted(kind);
        }
    }

    fn finish(self, project_name: &str) -> Result<ConversionOutcome, ConvertError> {
        let Converter {
            mut registry,
            manifest,
            mut output,
            mut report,
            ..
        } = self;

        let manifest = manifest.finalize(project_name, &mut registry);
        for synthetic in &manifest.synthetic {
            write_synthetic(&mut output, synthetic)?;
            report.synthetic.push(synthetic.entry.name.clone());
        }

        let file = format!("{}.{}", project_name, MANIFEST_EXTENSION);
        let manifest_path = output.abs(&file);
        output
            .write_json(&file, &manifest)
            .map_err(|source| ConvertError::ManifestWrite {
                path: manifest_path.clone(),
                source,
            })?;

        tracing::info!(
            "Wrote {} with {} resource(s)",
            manifest_path.display(),
            manifest.entries().count()
        );

        Ok(ConversionOutcome {
            manifest,
            report,
            manifest_path,
            created: output.created().to_vec(),
        })
    }
}

fn write_synthetic(
    output: &mut OutputTree,
    synthetic: &SyntheticResource,
) -> Result<(), ConvertError> {
    let entry = &synthetic.entry;
    let written = match (synthetic.reason, entry.kind) {
        (SyntheticReason::DefaultGroup, TargetKind::AudioGroup) => {
            output.write_json(&entry.path, &groups::audio_group_document(&entry.name))
        }
        (SyntheticReason::DefaultGroup, TargetKind::TextureGroup) => {
            output.write_json(&entry.path, &groups::texture_group_document(&entry.name, true))
        }
        _ => {
            let document = PlaceholderDocument {
                header: ResourceHeader::new(entry.kind, &entry.name).with_tag(PLACEHOLDER_TAG),
            };
            output.write_json(&entry.path, &document)
        }
    };
    written.map_err(|source| ConvertError::SyntheticWrite {
        path: output.abs(&entry.path),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::graph::Script;
    use crate::source::MemorySource;
    use crate::types::DEFAULT_TEXTURE_GROUP;
    use tempfile::TempDir;

    #[test]
    fn test_project_name_fallbacks() {
        let mut config = ConvertConfig::default();
        let mut graph = SourceGraph::default();
        assert_eq!(project_name(&config, &graph), "Project");

        graph.name = Some("My Game".into());
        assert_eq!(project_name(&config, &graph), "My_Game");

        config.project_name = Some("Ported".into());
        assert_eq!(project_name(&config, &graph), "Ported");
    }

    #[test]
    fn test_unnamed_resource_is_skipped() {
        let graph = SourceGraph {
            scripts: vec![
                Script { name: Some("scr_ok".into()) },
                Script { name: None },
            ],
            ..Default::default()
        };
        let source = MemorySource::new(graph);
        let config = ConvertConfig::default();
        let dir = TempDir::new().unwrap();
        let output = OutputTree::prepare(dir.path(), false).unwrap();

        let outcome = convert_project(&source, &config, output).unwrap();
        assert_eq!(outcome.report.converted_count(TargetKind::Script), 1);
        assert_eq!(outcome.report.skipped.len(), 1);
        assert_eq!(outcome.report.skipped[0].reason, "missing name");
    }

    #[test]
    fn test_default_groups_are_written() {
        let source = MemorySource::new(SourceGraph::default());
        let config = ConvertConfig::default();
        let dir = TempDir::new().unwrap();
        let output = OutputTree::prepare(dir.path(), false).unwrap();

        let outcome = convert_project(&source, &config, output).unwrap();
        assert!(outcome.manifest_path.ends_with("Project.yyp"));
        assert!(outcome.manifest_path.exists());
        assert!(dir.path().join("audiogroups/audiogroup_default.yy").exists());
        assert!(dir
            .path()
            .join(format!("texturegroups/{}.yy", DEFAULT_TEXTURE_GROUP))
            .exists());
        assert_eq!(outcome.report.synthetic.len(), 2);
    }

    #[test]
    fn test_manifest_write_failure_is_fatal() {
        let source = MemorySource::new(SourceGraph::default());
        let config = ConvertConfig::default();
        let dir = TempDir::new().unwrap();
        let output = OutputTree::prepare(dir.path(), false).unwrap();
        std::fs::create_dir(dir.path().join("Project.yyp")).unwrap();

        match convert_project(&source, &config, output).unwrap_err() {
            ConvertError::ManifestWrite { path, .. } => assert!(path.ends_with("Project.yyp")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_synthetic_write_failure_is_fatal() {
        let source = MemorySource::new(SourceGraph::default());
        let config = ConvertConfig::default();
        let dir = TempDir::new().unwrap();
        let output = OutputTree::prepare(dir.path(), false).unwrap();
        // A file where the texture group folder should go
        std::fs::write(dir.path().join("texturegroups"), "").unwrap();

        match convert_project(&source, &config, output).unwrap_err() {
            ConvertError::SyntheticWrite { path, .. } => {
                assert!(path.ends_with(format!("{}.yy", DEFAULT_TEXTURE_GROUP)))
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dir.path().join("Project.yyp").exists());
    }
}
