//! Extensions
//!
//! Only the descriptor survives: extension binaries are not embedded in the
//! data file, so every extension is reported for manual restoration.

use anyhow::Result;
use serde::Serialize;

use super::Converter;
use crate::report::ManualStep;
use crate::types::{Identity, ResourceHeader, SourceKind, TargetKind, RESOURCE_VERSION};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtensionDocument {
    extension_version: String,
    export_to_game: bool,
    supported_targets: i64,
    files: Vec<ExtensionFile>,
    #[serde(flatten)]
    header: ResourceHeader,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtensionFile {
    filename: String,
    kind: u32,
    functions: Vec<ExtensionFunction>,
    copy_to_targets: i64,
    resource_type: &'static str,
    resource_version: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtensionFunction {
    external_name: String,
    name: String,
    kind: u32,
    help: String,
    hidden: bool,
    return_type: u32,
    arg_count: i32,
    args: Vec<u32>,
}

/// Extension file kind from its file extension: 1 native, 2 GML, 5 JavaScript, 4 other
pub fn extension_file_kind(filename: &str) -> u32 {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "dll" | "so" | "dylib" => 1,
        "gml" => 2,
        "js" => 5,
        _ => 4,
    }
}

impl<'a> Converter<'a> {
    pub(crate) fn convert_extensions(&mut self) {
        self.run_phase(TargetKind::Extension, SourceKind::Extension, Self::convert_extension);
    }

    fn convert_extension(&mut self, index: usize, identity: &Identity) -> Result<()> {
        let extension = &self.graph().extensions[index];
        let name = &identity.name;

        // Functions cannot be attributed to files; they all go on the first one
        let mut functions: Vec<ExtensionFunction> = extension
            .functions
            .iter()
            .map(|function| ExtensionFunction {
                external_name: function.clone(),
                name: function.clone(),
                kind: 1,
                help: String::new(),
                hidden: false,
                return_type: 2,
                arg_count: -1,
                args: Vec::new(),
            })
            .collect();

        let files = extension
            .files
            .iter()
            .map(|filename| ExtensionFile {
                filename: filename.clone(),
                kind: extension_file_kind(filename),
                functions: std::mem::take(&mut functions),
                copy_to_targets: -1,
                resource_type: "GMExtensionFile",
                resource_version: RESOURCE_VERSION,
            })
            .collect();
        if !functions.is_empty() {
            tracing::warn!("Extension {} declares functions but no files", name);
        }

        let document = ExtensionDocument {
            extension_version: extension
                .version
                .clone()
                .unwrap_or_else(|| "1.0.0".to_string()),
            export_to_game: true,
            supported_targets: -1,
            files,
            header: ResourceHeader::new(TargetKind::Extension, name),
        };
        self.write_descriptor(TargetKind::Extension, name, &document)?;
        self.register(TargetKind::Extension, identity);
        self.report.record_manual(ManualStep::RestoreExtension {
            extension: name.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kinds() {
        assert_eq!(extension_file_kind("steam.dll"), 1);
        assert_eq!(extension_file_kind("helpers.GML"), 2);
        assert_eq!(extension_file_kind("web.js"), 5);
        assert_eq!(extension_file_kind("README"), 4);
    }
}
