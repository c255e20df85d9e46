//! Tilesets
//!
//! Every background carrying tile info becomes a tileset named `ts_<name>`,
//! pointing at the sprite the same background converted to.

use anyhow::Result;
use serde::Serialize;

use super::Converter;
use crate::source::graph::TileInfo;
use crate::types::{Identity, ResourceHeader, ResourceRef, SourceHandle, SourceKind, TargetKind};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TileSetDocument {
    sprite_id: Option<ResourceRef>,
    texture_group_id: Option<ResourceRef>,
    tile_width: u32,
    tile_height: u32,
    tilexoff: u32,
    tileyoff: u32,
    tilehsep: u32,
    tilevsep: u32,
    out_tilehborder: u32,
    out_tilevborder: u32,
    sprite_no_export: bool,
    out_columns: u32,
    tile_count: u32,
    #[serde(flatten)]
    header: ResourceHeader,
}

impl<'a> Converter<'a> {
    pub(crate) fn convert_tilesets(&mut self) {
        let graph = self.graph();
        let inputs: Vec<(usize, TileInfo)> = graph
            .backgrounds
            .iter()
            .enumerate()
            .filter_map(|(i, bg)| bg.tiles.map(|tiles| (i, tiles)))
            .collect();
        tracing::info!("Converting {} {}...", inputs.len(), TargetKind::TileSet.display_name());

        for (index, tiles) in inputs {
            let handle = SourceHandle::new(SourceKind::Background, index);
            let Some(identity) = self.registry.identity_for(graph, TargetKind::TileSet, handle)
            else {
                tracing::warn!("Skipping {}: it has no usable name", handle);
                self.report.record_skipped(
                    TargetKind::TileSet,
                    &handle.to_string(),
                    "missing name".to_string(),
                );
                continue;
            };
            self.isolate(TargetKind::TileSet, &identity.name, |c| {
                c.convert_tileset(index, tiles, &identity)
            });
        }
    }

    fn convert_tileset(&mut self, index: usize, tiles: TileInfo, identity: &Identity) -> Result<()> {
        let graph = self.graph();
        let background = &graph.backgrounds[index];

        // Without image data the background never became a sprite
        let sprite = match background.image {
            Some(_) => self.registry.resolve_index(
                graph,
                SourceKind::Background,
                Some(index),
                TargetKind::Sprite,
            ),
            None => {
                tracing::warn!("Tileset {} has no image, leaving its sprite empty", identity.name);
                None
            }
        };
        let texture_group = self.registry.resolve_group(
            graph,
            SourceKind::TextureGroup,
            background.texture_group,
            TargetKind::TextureGroup,
        );

        let columns = if tiles.columns > 0 {
            tiles.columns
        } else {
            derived_columns(background.width, &tiles)
        };

        let document = TileSetDocument {
            sprite_id: sprite,
            texture_group_id: texture_group,
            tile_width: tiles.tile_width,
            tile_height: tiles.tile_height,
            tilexoff: tiles.offset_x,
            tileyoff: tiles.offset_y,
            tilehsep: tiles.separation_x,
            tilevsep: tiles.separation_y,
            out_tilehborder: 2,
            out_tilevborder: 2,
            sprite_no_export: true,
            out_columns: columns,
            tile_count: tiles.tile_count,
            header: ResourceHeader::new(TargetKind::TileSet, &identity.name),
        };
        self.write_descriptor(TargetKind::TileSet, &identity.name, &document)?;
        self.register(TargetKind::TileSet, identity);
        Ok(())
    }
}

/// Columns that fit in an image of `width`; 1 when the tile stride is zero or overflows
pub fn derived_columns(width: u32, tiles: &TileInfo) -> u32 {
    let stride = match tiles.tile_width.checked_add(tiles.separation_x) {
        Some(stride) if stride > 0 => u64::from(stride),
        _ => return 1,
    };
    let span = u64::from(width.saturating_sub(tiles.offset_x)) + u64::from(tiles.separation_x);
    u32::try_from(span / stride).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_columns() {
        let tiles = TileInfo {
            tile_width: 16,
            tile_height: 16,
            ..Default::default()
        };
        assert_eq!(derived_columns(128, &tiles), 8);

        let spaced = TileInfo {
            tile_width: 16,
            separation_x: 2,
            offset_x: 1,
            ..Default::default()
        };
        // 1 + 16 + 2 + 16 + 2 + 16 = 53
        assert_eq!(derived_columns(53, &spaced), 3);
        assert_eq!(derived_columns(64, &TileInfo::default()), 1);
    }

    #[test]
    fn test_derived_columns_with_extreme_sizes() {
        let huge = TileInfo {
            tile_width: u32::MAX,
            separation_x: 1,
            ..Default::default()
        };
        assert_eq!(derived_columns(64, &huge), 1);

        let thin = TileInfo {
            tile_width: 1,
            separation_x: u32::MAX - 1,
            ..Default::default()
        };
        assert_eq!(derived_columns(u32::MAX, &thin), 1);
    }
}
