//! Resource kinds on both sides of the conversion

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind tag of a resource in the source object graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    AudioGroup,
    TextureGroup,
    Sprite,
    Background,
    Sound,
    Font,
    Path,
    Script,
    Shader,
    Timeline,
    Object,
    Room,
    IncludedFile,
    Extension,
}

impl SourceKind {
    pub const ALL: [SourceKind; 14] = [
        SourceKind::AudioGroup,
        SourceKind::TextureGroup,
        SourceKind::Sprite,
        SourceKind::Background,
        SourceKind::Sound,
        SourceKind::Font,
        SourceKind::Path,
        SourceKind::Script,
        SourceKind::Shader,
        SourceKind::Timeline,
        SourceKind::Object,
        SourceKind::Room,
        SourceKind::IncludedFile,
        SourceKind::Extension,
    ];
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceKind::AudioGroup => "audio group",
            SourceKind::TextureGroup => "texture group",
            SourceKind::Sprite => "sprite",
            SourceKind::Background => "background",
            SourceKind::Sound => "sound",
            SourceKind::Font => "font",
            SourceKind::Path => "path",
            SourceKind::Script => "script",
            SourceKind::Shader => "shader",
            SourceKind::Timeline => "timeline",
            SourceKind::Object => "object",
            SourceKind::Room => "room",
            SourceKind::IncludedFile => "included file",
            SourceKind::Extension => "extension",
        };
        f.write_str(s)
    }
}

/// Opaque handle to one resource in the source graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceHandle {
    pub kind: SourceKind,
    pub index: usize,
}

impl SourceHandle {
    pub fn new(kind: SourceKind, index: usize) -> Self {
        Self { kind, index }
    }
}

impl fmt::Display for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.kind, self.index)
    }
}

/// Kind of resource in the target project.
///
/// The declaration order is the converter order and the folder order in the
/// manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetKind {
    AudioGroup,
    TextureGroup,
    Sprite,
    Sound,
    TileSet,
    Font,
    Path,
    Script,
    Shader,
    Timeline,
    Object,
    Room,
    IncludedFile,
    Extension,
}

impl TargetKind {
    pub const ALL: [TargetKind; 14] = [
        TargetKind::AudioGroup,
        TargetKind::TextureGroup,
        TargetKind::Sprite,
        TargetKind::Sound,
        TargetKind::TileSet,
        TargetKind::Font,
        TargetKind::Path,
        TargetKind::Script,
        TargetKind::Shader,
        TargetKind::Timeline,
        TargetKind::Object,
        TargetKind::Room,
        TargetKind::IncludedFile,
        TargetKind::Extension,
    ];

    /// Directory under the project root holding resources of this kind
    pub fn folder(self) -> &'static str {
        match self {
            TargetKind::AudioGroup => "audiogroups",
            TargetKind::TextureGroup => "texturegroups",
            TargetKind::Sprite => "sprites",
            TargetKind::Sound => "sounds",
            TargetKind::TileSet => "tilesets",
            TargetKind::Font => "fonts",
            TargetKind::Path => "paths",
            TargetKind::Script => "scripts",
            TargetKind::Shader => "shaders",
            TargetKind::Timeline => "timelines",
            TargetKind::Object => "objects",
            TargetKind::Room => "rooms",
            TargetKind::IncludedFile => "datafiles",
            TargetKind::Extension => "extensions",
        }
    }

    /// Name of the IDE folder node listing this kind
    pub fn display_name(self) -> &'static str {
        match self {
            TargetKind::AudioGroup => "Audio Groups",
            TargetKind::TextureGroup => "Texture Groups",
            TargetKind::Sprite => "Sprites",
            TargetKind::Sound => "Sounds",
            TargetKind::TileSet => "Tile Sets",
            TargetKind::Font => "Fonts",
            TargetKind::Path => "Paths",
            TargetKind::Script => "Scripts",
            TargetKind::Shader => "Shaders",
            TargetKind::Timeline => "Timelines",
            TargetKind::Object => "Objects",
            TargetKind::Room => "Rooms",
            TargetKind::IncludedFile => "Included Files",
            TargetKind::Extension => "Extensions",
        }
    }

    /// `resourceType` tag written into descriptors of this kind
    pub fn resource_type(self) -> &'static str {
        match self {
            TargetKind::AudioGroup => "GMAudioGroup",
            TargetKind::TextureGroup => "GMTextureGroup",
            TargetKind::Sprite => "GMSprite",
            TargetKind::Sound => "GMSound",
            TargetKind::TileSet => "GMTileSet",
            TargetKind::Font => "GMFont",
            TargetKind::Path => "GMPath",
            TargetKind::Script => "GMScript",
            TargetKind::Shader => "GMShader",
            TargetKind::Timeline => "GMTimeline",
            TargetKind::Object => "GMObject",
            TargetKind::Room => "GMRoom",
            TargetKind::IncludedFile => "GMIncludedFile",
            TargetKind::Extension => "GMExtension",
        }
    }

    /// Name of the synthetic default group of this kind, if it has one
    pub fn default_group(self) -> Option<&'static str> {
        match self {
            TargetKind::AudioGroup => Some(DEFAULT_AUDIO_GROUP),
            TargetKind::TextureGroup => Some(DEFAULT_TEXTURE_GROUP),
            _ => None,
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder())
    }
}

/// Name of the audio group every sound without an explicit group belongs to
pub const DEFAULT_AUDIO_GROUP: &str = "audiogroup_default";

/// Name of the texture group every image without an explicit group belongs to
pub const DEFAULT_TEXTURE_GROUP: &str = "Default";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_folders_are_distinct() {
        let folders: HashSet<_> = TargetKind::ALL.iter().map(|k| k.folder()).collect();
        assert_eq!(folders.len(), TargetKind::ALL.len());
    }

    #[test]
    fn test_all_is_sorted_in_converter_order() {
        let mut sorted = TargetKind::ALL;
        sorted.sort();
        assert_eq!(sorted, TargetKind::ALL);
        assert_eq!(TargetKind::ALL[0], TargetKind::AudioGroup);
        assert_eq!(TargetKind::ALL[11], TargetKind::Room);
    }

    #[test]
    fn test_default_groups() {
        assert_eq!(TargetKind::AudioGroup.default_group(), Some("audiogroup_default"));
        assert_eq!(TargetKind::TextureGroup.default_group(), Some("Default"));
        assert!(TargetKind::Sprite.default_group().is_none());
    }
}
