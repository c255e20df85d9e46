//! Sprites
//!
//! Real sprites and backgrounds carrying an image share one pipeline and one
//! naming pool: a background converts to a single-frame sprite.

use anyhow::{bail, Result};
use image::{Rgba, RgbaImage};
use serde::Serialize;

use super::Converter;
use crate::path_utils::join_relative;
use crate::source::graph::Sprite;
use crate::source::TextureHandle;
use crate::types::{
    resource_dir, Identity, PlaceholderConfig, ResourceHeader, ResourceRef, SourceHandle,
    SourceKind, TargetKind, RESOURCE_VERSION,
};

/// One input of the sprite converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionInput {
    Sprite(usize),
    /// A background with image data, converted as a one-frame sprite
    BackgroundAsSprite(usize),
}

impl ConversionInput {
    pub fn handle(self) -> SourceHandle {
        match self {
            ConversionInput::Sprite(i) => SourceHandle::new(SourceKind::Sprite, i),
            ConversionInput::BackgroundAsSprite(i) => SourceHandle::new(SourceKind::Background, i),
        }
    }
}

/// The fields both inputs provide
struct SpriteShape {
    width: u32,
    height: u32,
    origin_x: i32,
    origin_y: i32,
    bbox: [i32; 4],
    bbox_mode: u32,
    collision_kind: u32,
    playback_speed: f32,
    texture_group: Option<usize>,
    frames: Option<Vec<Option<TextureHandle>>>,
}

impl SpriteShape {
    fn from_sprite(sprite: &Sprite) -> Self {
        Self {
            width: sprite.width,
            height: sprite.height,
            origin_x: sprite.origin_x,
            origin_y: sprite.origin_y,
            bbox: [
                sprite.bbox_left,
                sprite.bbox_top,
                sprite.bbox_right,
                sprite.bbox_bottom,
            ],
            bbox_mode: sprite.bbox_mode,
            collision_kind: sprite.collision_kind,
            playback_speed: sprite.playback_speed,
            texture_group: sprite.texture_group,
            frames: sprite.frames.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpriteDocument {
    bbox_mode: u32,
    collision_kind: u32,
    origin: u32,
    #[serde(rename = "bbox_left")]
    bbox_left: i32,
    #[serde(rename = "bbox_right")]
    bbox_right: i32,
    #[serde(rename = "bbox_top")]
    bbox_top: i32,
    #[serde(rename = "bbox_bottom")]
    bbox_bottom: i32,
    width: u32,
    height: u32,
    texture_group_id: Option<ResourceRef>,
    frames: Vec<SpriteFrame>,
    sequence: SpriteSequence,
    layers: Vec<ImageLayer>,
    #[serde(flatten)]
    header: ResourceHeader,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpriteFrame {
    name: String,
    /// PNG relative to the project root
    image: String,
    resource_type: &'static str,
    resource_version: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpriteSequence {
    sprite_id: ResourceRef,
    playback_speed: f32,
    playback_speed_type: u32,
    length: f32,
    xorigin: i32,
    yorigin: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageLayer {
    name: String,
    display_name: &'static str,
    visible: bool,
    opacity: f32,
    resource_type: &'static str,
}

/// Largest placeholder edge; GameMaker texture pages stop at 8192
const MAX_PLACEHOLDER_EXTENT: u32 = 8192;

/// Index of the last pixel along an edge of `extent` pixels
fn last_pixel(extent: u32) -> i32 {
    i32::try_from(extent).unwrap_or(i32::MAX).saturating_sub(1)
}

/// Solid image of the configured colour; zero dimensions use the configured size
pub(crate) fn placeholder_image(config: &PlaceholderConfig, width: u32, height: u32) -> RgbaImage {
    let extent = |size: u32, fallback: u32| {
        let size = if size == 0 { fallback } else { size };
        size.clamp(1, MAX_PLACEHOLDER_EXTENT)
    };
    RgbaImage::from_pixel(
        extent(width, config.width),
        extent(height, config.height),
        Rgba(config.rgba()),
    )
}

/// Origin preset index; 9 means custom
pub fn origin_preset(width: u32, height: u32, x: i32, y: i32) -> u32 {
    let (w, h) = (i64::from(width), i64::from(height));
    let (x, y) = (i64::from(x), i64::from(y));
    let column = [0, w / 2, w].iter().position(|&c| c == x);
    let row = [0, h / 2, h].iter().position(|&r| r == y);
    match (column, row) {
        (Some(c), Some(r)) => (r * 3 + c) as u32,
        _ => 9,
    }
}

impl<'a> Converter<'a> {
    pub(crate) fn convert_sprites(&mut self) {
        let graph = self.graph();
        let inputs: Vec<ConversionInput> = (0..graph.sprites.len())
            .map(ConversionInput::Sprite)
            .chain(
                graph
                    .backgrounds
                    .iter()
                    .enumerate()
                    .filter(|(_, bg)| bg.image.is_some())
                    .map(|(i, _)| ConversionInput::BackgroundAsSprite(i)),
            )
            .collect();
        tracing::info!("Converting {} {}...", inputs.len(), TargetKind::Sprite.display_name());

        for input in inputs {
            let handle = input.handle();
            let Some(identity) = self.registry.identity_for(graph, TargetKind::Sprite, handle)
            else {
                tracing::warn!("Skipping {}: it has no usable name", handle);
                self.report.record_skipped(
                    TargetKind::Sprite,
                    &handle.to_string(),
                    "missing name".to_string(),
                );
                continue;
            };
            self.isolate(TargetKind::Sprite, &identity.name, |c| {
                c.convert_sprite(input, &identity)
            });
        }
    }

    fn sprite_shape(&self, input: ConversionInput) -> SpriteShape {
        let graph = self.graph();
        match input {
            ConversionInput::Sprite(i) => SpriteShape::from_sprite(&graph.sprites[i]),
            ConversionInput::BackgroundAsSprite(i) => {
                let bg = &graph.backgrounds[i];
                SpriteShape {
                    width: bg.width,
                    height: bg.height,
                    origin_x: 0,
                    origin_y: 0,
                    bbox: [0, 0, last_pixel(bg.width), last_pixel(bg.height)],
                    bbox_mode: 1,
                    collision_kind: 1,
                    playback_speed: 0.0,
                    texture_group: bg.texture_group,
                    frames: Some(vec![bg.image]),
                }
            }
        }
    }

    fn convert_sprite(&mut self, input: ConversionInput, identity: &Identity) -> Result<()> {
        let shape = self.sprite_shape(input);
        let frame_handles = match shape.frames.as_deref() {
            Some(frames) if !frames.is_empty() => frames,
            _ => bail!("no image data"),
        };

        let name = &identity.name;
        let graph = self.graph();
        let texture_group = self.registry.resolve_group(
            graph,
            SourceKind::TextureGroup,
            shape.texture_group,
            TargetKind::TextureGroup,
        );

        let images_dir = join_relative([resource_dir(TargetKind::Sprite, name).as_str(), "images"]);
        self.output.create_dir(&images_dir)?;

        let mut frames = Vec::with_capacity(frame_handles.len());
        for (i, frame) in frame_handles.iter().enumerate() {
            let frame_id = self
                .registry
                .get_or_create_id(&format!("sprites/{}/frames/{}", name, i));
            let rel = join_relative([images_dir.as_str(), format!("{}.png", frame_id).as_str()]);

            let image = match frame.and_then(|h| self.source.render_subimage(h)) {
                Some(image) => image,
                None => {
                    tracing::warn!("Sprite {} frame {} has no image, using a placeholder", name, i);
                    self.report.placeholder_frames += 1;
                    placeholder_image(&self.config.placeholder, shape.width, shape.height)
                }
            };
            self.output.write_png(&rel, &image)?;

            frames.push(SpriteFrame {
                name: frame_id.to_string(),
                image: rel,
                resource_type: "GMSpriteFrame",
                resource_version: RESOURCE_VERSION,
            });
        }

        let [bbox_left, bbox_top, bbox_right, bbox_bottom] = shape.bbox;
        let layer_id = self
            .registry
            .get_or_create_id(&format!("sprites/{}/layers/default", name));
        let document = SpriteDocument {
            bbox_mode: shape.bbox_mode,
            collision_kind: shape.collision_kind,
            origin: origin_preset(shape.width, shape.height, shape.origin_x, shape.origin_y),
            bbox_left,
            bbox_right,
            bbox_top,
            bbox_bottom,
            width: shape.width,
            height: shape.height,
            texture_group_id: texture_group,
            sequence: SpriteSequence {
                sprite_id: ResourceRef::new(TargetKind::Sprite, identity),
                playback_speed: shape.playback_speed,
                playback_speed_type: 0,
                length: frames.len() as f32,
                xorigin: shape.origin_x,
                yorigin: shape.origin_y,
            },
            frames,
            layers: vec![ImageLayer {
                name: layer_id.to_string(),
                display_name: "default",
                visible: true,
                opacity: 100.0,
                resource_type: "GMImageLayer",
            }],
            header: ResourceHeader::new(TargetKind::Sprite, name),
        };

        self.write_descriptor(TargetKind::Sprite, name, &document)?;
        self.register(TargetKind::Sprite, identity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_preset() {
        assert_eq!(origin_preset(32, 32, 0, 0), 0);
        assert_eq!(origin_preset(32, 32, 16, 16), 4);
        assert_eq!(origin_preset(32, 32, 32, 32), 8);
        assert_eq!(origin_preset(32, 32, 16, 32), 7);
        assert_eq!(origin_preset(32, 32, 5, 7), 9);
    }

    #[test]
    fn test_origin_preset_with_huge_sizes() {
        assert_eq!(origin_preset(u32::MAX, u32::MAX, 0, 0), 0);
        assert_eq!(origin_preset(u32::MAX, u32::MAX, i32::MAX, i32::MAX), 9);
    }

    #[test]
    fn test_last_pixel_saturates() {
        assert_eq!(last_pixel(64), 63);
        assert_eq!(last_pixel(0), -1);
        assert_eq!(last_pixel(1 << 31), i32::MAX - 1);
        assert_eq!(last_pixel(u32::MAX), i32::MAX - 1);
    }

    #[test]
    fn test_placeholder_sizes() {
        let config = PlaceholderConfig::default();
        assert_eq!(placeholder_image(&config, 0, 0).dimensions(), (16, 16));
        assert_eq!(placeholder_image(&config, 3, 5).dimensions(), (3, 5));
        assert_eq!(
            placeholder_image(&config, u32::MAX, 2).dimensions(),
            (MAX_PLACEHOLDER_EXTENT, 2)
        );
    }

    #[test]
    fn test_input_handles() {
        assert_eq!(
            ConversionInput::BackgroundAsSprite(2).handle(),
            SourceHandle::new(SourceKind::Background, 2)
        );
        assert_eq!(
            ConversionInput::Sprite(0).handle(),
            SourceHandle::new(SourceKind::Sprite, 0)
        );
    }
}
