//! Audio and texture groups

use anyhow::Result;
use serde::Serialize;

use super::Converter;
use crate::types::{Identity, ResourceHeader, SourceKind, TargetKind};

/// Platform mask meaning "all targets"
const ALL_TARGETS: i64 = -1;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioGroupDocument {
    targets: i64,
    #[serde(flatten)]
    header: ResourceHeader,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureGroupDocument {
    is_scaled: bool,
    autocrop: bool,
    border: u32,
    mips_to_generate: u32,
    group_parent: Option<()>,
    targets: i64,
    load_type: &'static str,
    #[serde(flatten)]
    header: ResourceHeader,
}

pub fn audio_group_document(name: &str) -> AudioGroupDocument {
    AudioGroupDocument {
        targets: ALL_TARGETS,
        header: ResourceHeader::new(TargetKind::AudioGroup, name),
    }
}

pub fn texture_group_document(name: &str, autoload: bool) -> TextureGroupDocument {
    TextureGroupDocument {
        is_scaled: true,
        autocrop: true,
        border: 2,
        mips_to_generate: 0,
        group_parent: None,
        targets: ALL_TARGETS,
        load_type: if autoload { "default" } else { "dynamicpages" },
        header: ResourceHeader::new(TargetKind::TextureGroup, name),
    }
}

impl<'a> Converter<'a> {
    pub(crate) fn convert_groups(&mut self) {
        self.run_phase(
            TargetKind::AudioGroup,
            SourceKind::AudioGroup,
            Self::convert_audio_group,
        );
        self.run_phase(
            TargetKind::TextureGroup,
            SourceKind::TextureGroup,
            Self::convert_texture_group,
        );
    }

    fn convert_audio_group(&mut self, _index: usize, identity: &Identity) -> Result<()> {
        let document = audio_group_document(&identity.name);
        self.write_descriptor(TargetKind::AudioGroup, &identity.name, &document)?;
        self.register(TargetKind::AudioGroup, identity);
        Ok(())
    }

    fn convert_texture_group(&mut self, index: usize, identity: &Identity) -> Result<()> {
        let autoload = self.graph().texture_groups[index].autoload;
        let document = texture_group_document(&identity.name, autoload);
        self.write_descriptor(TargetKind::TextureGroup, &identity.name, &document)?;
        self.register(TargetKind::TextureGroup, identity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_group_document() {
        let json = serde_json::to_value(texture_group_document("tg_ui", false)).unwrap();
        assert_eq!(json["resourceType"], "GMTextureGroup");
        assert_eq!(json["name"], "tg_ui");
        assert_eq!(json["loadType"], "dynamicpages");
        assert_eq!(json["targets"], -1);
        assert!(json["groupParent"].is_null());
    }

    #[test]
    fn test_audio_group_document() {
        let json = serde_json::to_value(audio_group_document("audiogroup_default")).unwrap();
        assert_eq!(json["resourceType"], "GMAudioGroup");
        assert_eq!(json["parent"]["name"], "Audio Groups");
    }
}
