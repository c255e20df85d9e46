//! Shaders

use anyhow::Result;
use serde::Serialize;

use super::Converter;
use crate::path_utils::join_relative;
use crate::types::{resource_dir, Identity, ResourceHeader, SourceKind, TargetKind};

/// Written when the data file carries no source for a stage
const MISSING_SHADER_SOURCE: &str = "// Shader source was not available in the data file.\n";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShaderDocument {
    /// 1 GLSL ES, 2 GLSL, 3 HLSL 9, 4 HLSL 11
    #[serde(rename = "type")]
    kind: u32,
    #[serde(flatten)]
    header: ResourceHeader,
}

impl<'a> Converter<'a> {
    pub(crate) fn convert_shaders(&mut self) {
        self.run_phase(TargetKind::Shader, SourceKind::Shader, Self::convert_shader);
    }

    fn convert_shader(&mut self, index: usize, identity: &Identity) -> Result<()> {
        let shader = &self.graph().shaders[index];
        let name = &identity.name;
        let dir = resource_dir(TargetKind::Shader, name);

        for (ext, stage) in [("vsh", &shader.vertex), ("fsh", &shader.fragment)] {
            let text = match stage {
                Some(text) => text.as_str(),
                None => {
                    tracing::warn!("Shader {} has no .{} source", name, ext);
                    MISSING_SHADER_SOURCE
                }
            };
            let rel = join_relative([dir.as_str(), format!("{}.{}", name, ext).as_str()]);
            self.output.write_text(&rel, text)?;
        }

        let document = ShaderDocument {
            kind: shader.kind.max(1),
            header: ResourceHeader::new(TargetKind::Shader, name),
        };
        self.write_descriptor(TargetKind::Shader, name, &document)?;
        self.register(TargetKind::Shader, identity);
        Ok(())
    }
}
