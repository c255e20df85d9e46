//! Parsed source object graph
//!
//! This is the shape the upstream loader hands over: one vector per resource
//! kind, cross-references stored as indices into the matching vector. The graph
//! is read-only for the whole conversion.

use serde::{Deserialize, Serialize};

use crate::types::{SourceHandle, SourceKind};

/// Index of a texture page item; resolved by the renderer, never by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureHandle(pub u32);

/// The whole source project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SourceGraph {
    /// Game name from the general info block
    pub name: Option<String>,
    pub audio_groups: Vec<AudioGroup>,
    pub texture_groups: Vec<TextureGroup>,
    pub sprites: Vec<Sprite>,
    pub backgrounds: Vec<Background>,
    pub sounds: Vec<Sound>,
    pub fonts: Vec<Font>,
    pub paths: Vec<Path>,
    pub scripts: Vec<Script>,
    pub shaders: Vec<Shader>,
    pub timelines: Vec<Timeline>,
    pub objects: Vec<Object>,
    pub rooms: Vec<Room>,
    pub included_files: Vec<IncludedFile>,
    pub extensions: Vec<Extension>,
}

impl SourceGraph {
    /// Raw source name of a resource, if it has one
    pub fn name_of(&self, handle: SourceHandle) -> Option<&str> {
        let i = handle.index;
        let name = match handle.kind {
            SourceKind::AudioGroup => self.audio_groups.get(i).map(|r| &r.name),
            SourceKind::TextureGroup => self.texture_groups.get(i).map(|r| &r.name),
            SourceKind::Sprite => self.sprites.get(i).map(|r| &r.name),
            SourceKind::Background => self.backgrounds.get(i).map(|r| &r.name),
            SourceKind::Sound => self.sounds.get(i).map(|r| &r.name),
            SourceKind::Font => self.fonts.get(i).map(|r| &r.name),
            SourceKind::Path => self.paths.get(i).map(|r| &r.name),
            SourceKind::Script => self.scripts.get(i).map(|r| &r.name),
            SourceKind::Shader => self.shaders.get(i).map(|r| &r.name),
            SourceKind::Timeline => self.timelines.get(i).map(|r| &r.name),
            SourceKind::Object => self.objects.get(i).map(|r| &r.name),
            SourceKind::Room => self.rooms.get(i).map(|r| &r.name),
            SourceKind::IncludedFile => self.included_files.get(i).map(|r| &r.name),
            SourceKind::Extension => self.extensions.get(i).map(|r| &r.name),
        };
        name.and_then(|n| n.as_deref())
    }

    /// Usable name: present and not blank
    pub fn usable_name(&self, handle: SourceHandle) -> Option<&str> {
        self.name_of(handle).filter(|n| !n.trim().is_empty())
    }

    /// Number of resources of one kind
    pub fn count(&self, kind: SourceKind) -> usize {
        match kind {
            SourceKind::AudioGroup => self.audio_groups.len(),
            SourceKind::TextureGroup => self.texture_groups.len(),
            SourceKind::Sprite => self.sprites.len(),
            SourceKind::Background => self.backgrounds.len(),
            SourceKind::Sound => self.sounds.len(),
            SourceKind::Font => self.fonts.len(),
            SourceKind::Path => self.paths.len(),
            SourceKind::Script => self.scripts.len(),
            SourceKind::Shader => self.shaders.len(),
            SourceKind::Timeline => self.timelines.len(),
            SourceKind::Object => self.objects.len(),
            SourceKind::Room => self.rooms.len(),
            SourceKind::IncludedFile => self.included_files.len(),
            SourceKind::Extension => self.extensions.len(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AudioGroup {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextureGroup {
    pub name: Option<String>,
    /// Whether the group is packed into its own page set on load
    pub autoload: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Sprite {
    pub name: Option<String>,
    pub width: u32,
    pub height: u32,
    pub origin_x: i32,
    pub origin_y: i32,
    pub bbox_left: i32,
    pub bbox_right: i32,
    pub bbox_top: i32,
    pub bbox_bottom: i32,
    /// 0 automatic, 1 full image, 2 manual
    pub bbox_mode: u32,
    /// 0 precise, 1 rectangle, 2 ellipse, 3 diamond
    pub collision_kind: u32,
    pub playback_speed: f32,
    pub texture_group: Option<usize>,
    /// Texture page item per frame; `None` means the loader found no image data
    pub frames: Option<Vec<Option<TextureHandle>>>,
}

/// Tile layout of a background used as a tileset
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TileInfo {
    pub tile_width: u32,
    pub tile_height: u32,
    pub separation_x: u32,
    pub separation_y: u32,
    pub offset_x: u32,
    pub offset_y: u32,
    pub columns: u32,
    pub tile_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Background {
    pub name: Option<String>,
    pub width: u32,
    pub height: u32,
    pub texture_group: Option<usize>,
    pub image: Option<TextureHandle>,
    pub tiles: Option<TileInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Sound {
    pub name: Option<String>,
    /// Original file name, used as an extension hint
    pub file_name: Option<String>,
    /// 0 uncompressed, 1 compressed, 2 decompress on load, 3 streamed
    pub compression: u32,
    pub volume: f32,
    pub pitch: f32,
    pub preload: bool,
    pub audio_group: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Glyph {
    pub character: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub shift: i32,
    pub offset: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Font {
    pub name: Option<String>,
    /// Typeface name shown in the font editor
    pub font_name: Option<String>,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub first_char: u32,
    pub last_char: u32,
    pub texture_group: Option<usize>,
    pub atlas: Option<TextureHandle>,
    pub glyphs: Vec<Glyph>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathPoint {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Path {
    pub name: Option<String>,
    pub smooth: bool,
    pub closed: bool,
    pub precision: u32,
    pub points: Vec<PathPoint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Script {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Shader {
    pub name: Option<String>,
    /// 1 GLSL ES, 2 GLSL, 3 HLSL 9, 4 HLSL 11
    pub kind: u32,
    pub vertex: Option<String>,
    pub fragment: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Timeline {
    pub name: Option<String>,
    /// Steps at which a moment fires
    pub moments: Vec<u32>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventEntry {
    pub event_type: u32,
    pub subtype: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Object {
    pub name: Option<String>,
    pub sprite: Option<usize>,
    pub mask: Option<usize>,
    pub parent: Option<usize>,
    pub visible: bool,
    pub solid: bool,
    pub persistent: bool,
    pub depth: i32,
    pub physics: bool,
    pub events: Vec<EventEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoomBackground {
    pub enabled: bool,
    pub foreground: bool,
    pub background: Option<usize>,
    pub x: i32,
    pub y: i32,
    pub tile_x: bool,
    pub tile_y: bool,
    pub speed_x: i32,
    pub speed_y: i32,
    pub stretch: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoomView {
    pub enabled: bool,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub port_x: i32,
    pub port_y: i32,
    pub port_width: u32,
    pub port_height: u32,
    pub follow: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TileLayer {
    pub background: Option<usize>,
    pub depth: i32,
    /// Number of tiles the source placed; the grid itself is not carried over
    pub tile_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoomInstance {
    pub instance_id: u32,
    pub object: Option<usize>,
    pub x: i32,
    pub y: i32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub rotation: f32,
    pub color: u32,
    pub has_creation_code: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Room {
    pub name: Option<String>,
    pub caption: Option<String>,
    pub width: u32,
    pub height: u32,
    pub speed: u32,
    pub persistent: bool,
    pub background_color: u32,
    pub draw_background_color: bool,
    pub has_creation_code: bool,
    pub backgrounds: Vec<RoomBackground>,
    pub views: Vec<RoomView>,
    pub tile_layers: Vec<TileLayer>,
    pub instances: Vec<RoomInstance>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IncludedFile {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Extension {
    pub name: Option<String>,
    pub version: Option<String>,
    pub files: Vec<String>,
    pub functions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sparse_graph() {
        let json = r#"{
            "name": "Demo",
            "sprites": [
                { "name": "spr_a", "width": 8, "height": 8, "frames": [0, null] },
                { "width": 4 }
            ],
            "objects": [ { "name": "obj_a", "sprite": 0, "events": [ { "eventType": 0 } ] } ]
        }"#;

        let graph: SourceGraph = serde_json::from_str(json).unwrap();
        assert_eq!(graph.name.as_deref(), Some("Demo"));
        assert_eq!(graph.sprites.len(), 2);
        assert_eq!(
            graph.sprites[0].frames,
            Some(vec![Some(TextureHandle(0)), None])
        );
        assert!(graph.sprites[1].frames.is_none());
        assert_eq!(graph.objects[0].sprite, Some(0));
        assert!(graph.rooms.is_empty());
    }

    #[test]
    fn test_usable_name() {
        let graph = SourceGraph {
            scripts: vec![
                Script { name: Some("scr_a".into()) },
                Script { name: Some("   ".into()) },
                Script { name: None },
            ],
            ..Default::default()
        };
        let h = |i| SourceHandle::new(SourceKind::Script, i);
        assert_eq!(graph.usable_name(h(0)), Some("scr_a"));
        assert_eq!(graph.usable_name(h(1)), None);
        assert_eq!(graph.usable_name(h(2)), None);
        assert_eq!(graph.usable_name(h(9)), None);
    }
}
