//! Rooms
//!
//! Rooms become layered documents: one instance layer, one background layer
//! per enabled background and one tile layer per source tile depth. Tile
//! grids are left empty and reported for manual painting.

use anyhow::Result;
use serde::Serialize;

use super::Converter;
use crate::path_utils::join_relative;
use crate::report::ManualStep;
use crate::source::graph::{Room, RoomView};
use crate::source::{CodeOwner, SourceGraph};
use crate::types::{
    resource_dir, resource_path, Identity, ResourceHeader, ResourceRef, SourceKind, TargetKind,
    RESOURCE_VERSION,
};

/// Room creation code file name
pub const ROOM_CREATION_CODE: &str = "RoomCreationCode.gml";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RoomDocument {
    is_dnd: bool,
    volume: f32,
    parent_room: Option<ResourceRef>,
    views: Vec<ViewDocument>,
    layers: Vec<Layer>,
    inherit_layers: bool,
    creation_code_file: String,
    inherit_code: bool,
    instance_creation_order: Vec<InstanceRef>,
    inherit_creation_order: bool,
    room_settings: RoomSettings,
    view_settings: ViewSettings,
    #[serde(flatten)]
    header: ResourceHeader,
}

/// Instances are addressed through the room that owns them
#[derive(Debug, Serialize)]
struct InstanceRef {
    name: String,
    path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct RoomSettings {
    #[serde(rename = "inheritRoomSettings")]
    inherit_room_settings: bool,
    width: u32,
    height: u32,
    persistent: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewSettings {
    inherit_view_settings: bool,
    enable_views: bool,
    clear_view_background: bool,
    clear_display_buffer: bool,
}

#[derive(Debug, Serialize)]
struct ViewDocument {
    inherit: bool,
    visible: bool,
    xview: i32,
    yview: i32,
    wview: u32,
    hview: u32,
    xport: i32,
    yport: i32,
    wport: u32,
    hport: u32,
    hborder: u32,
    vborder: u32,
    hspeed: i32,
    vspeed: i32,
    #[serde(rename = "objectId")]
    object_id: Option<ResourceRef>,
}

/// Fields every layer carries
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LayerCommon {
    name: String,
    depth: i32,
    visible: bool,
    resource_version: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "resourceType")]
enum Layer {
    #[serde(rename = "GMRInstanceLayer")]
    Instances(InstanceLayer),
    #[serde(rename = "GMRBackgroundLayer")]
    Background(BackgroundLayer),
    #[serde(rename = "GMRTileLayer")]
    Tiles(TileLayerDocument),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InstanceLayer {
    instances: Vec<InstanceDocument>,
    #[serde(flatten)]
    common: LayerCommon,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InstanceDocument {
    name: String,
    object_id: ResourceRef,
    x: i32,
    y: i32,
    scale_x: f32,
    scale_y: f32,
    rotation: f32,
    colour: u32,
    has_creation_code: bool,
    inherit_code: bool,
    image_index: u32,
    image_speed: f32,
    resource_type: &'static str,
    resource_version: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BackgroundLayer {
    sprite_id: Option<ResourceRef>,
    colour: u32,
    x: i32,
    y: i32,
    htiled: bool,
    vtiled: bool,
    hspeed: i32,
    vspeed: i32,
    stretch: bool,
    #[serde(flatten)]
    common: LayerCommon,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TileLayerDocument {
    tileset_id: Option<ResourceRef>,
    x: i32,
    y: i32,
    tiles: TileGrid,
    #[serde(flatten)]
    common: LayerCommon,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TileGrid {
    serialise_width: u32,
    serialise_height: u32,
    tile_serialise_data: Vec<u32>,
}

/// GameMaker's default colour for solid room backgrounds (opaque black, ABGR)
const OPAQUE_BLACK: u32 = 0xFF00_0000;

fn layer(name: String, depth: i32) -> LayerCommon {
    LayerCommon {
        name,
        depth,
        visible: true,
        resource_version: RESOURCE_VERSION,
    }
}

/// Code file of an instance's creation code
pub fn instance_code_file(instance: &str) -> String {
    format!("InstanceCreationCode_{}.gml", instance)
}

/// Raw instance name; disambiguated in the global pool like every other name
pub fn instance_raw_name(instance_id: u32) -> String {
    format!("inst_{:X}", instance_id)
}

/// Depth of the `i`th background layer; foregrounds draw above instances
fn background_depth(i: usize, foreground: bool) -> i32 {
    let offset = i32::try_from(i).unwrap_or(i32::MAX).saturating_mul(100);
    if foreground {
        (-100i32).saturating_sub(offset)
    } else {
        1000i32.saturating_add(offset)
    }
}

impl<'a> Converter<'a> {
    pub(crate) fn convert_rooms(&mut self) {
        self.run_phase(TargetKind::Room, SourceKind::Room, Self::convert_room);
    }

    fn convert_room(&mut self, index: usize, identity: &Identity) -> Result<()> {
        let graph = self.graph();
        let room = &graph.rooms[index];
        let name = &identity.name;
        let dir = resource_dir(TargetKind::Room, name);

        let creation_code_file = if room.has_creation_code {
            let rel = join_relative([dir.as_str(), ROOM_CREATION_CODE]);
            self.emit_code(CodeOwner::RoomCreation(index), &rel)?;
            rel
        } else {
            String::new()
        };

        let (instance_layer, creation_order) = self.convert_instances(index, room, name, &dir)?;
        let mut layers = vec![Layer::Instances(instance_layer)];
        layers.extend(self.background_layers(graph, room));
        let tile_layers = self.tile_layers(graph, room);
        if !tile_layers.is_empty() {
            let tiles = room.tile_layers.iter().map(|t| u64::from(t.tile_count)).sum();
            self.report.record_manual(ManualStep::PaintTiles {
                room: name.clone(),
                layers: tile_layers.len(),
                tiles,
            });
        }
        layers.extend(tile_layers);

        let views = room
            .views
            .iter()
            .map(|view| self.convert_view(graph, view))
            .collect();

        let document = RoomDocument {
            is_dnd: false,
            volume: 1.0,
            parent_room: None,
            views,
            layers,
            inherit_layers: false,
            creation_code_file,
            inherit_code: false,
            instance_creation_order: creation_order,
            inherit_creation_order: false,
            room_settings: RoomSettings {
                inherit_room_settings: false,
                width: room.width,
                height: room.height,
                persistent: room.persistent,
            },
            view_settings: ViewSettings {
                inherit_view_settings: false,
                enable_views: room.views.iter().any(|v| v.enabled),
                clear_view_background: false,
                clear_display_buffer: true,
            },
            header: ResourceHeader::new(TargetKind::Room, name),
        };
        self.write_descriptor(TargetKind::Room, name, &document)?;
        self.register(TargetKind::Room, identity);
        Ok(())
    }

    fn convert_instances(
        &mut self,
        index: usize,
        room: &Room,
        room_name: &str,
        dir: &str,
    ) -> Result<(InstanceLayer, Vec<InstanceRef>)> {
        let graph = self.graph();
        let room_path = resource_path(TargetKind::Room, room_name);
        let mut instances = Vec::with_capacity(room.instances.len());
        let mut order = Vec::with_capacity(room.instances.len());

        for instance in &room.instances {
            let Some(object) = self.registry.resolve_index(
                graph,
                SourceKind::Object,
                instance.object,
                TargetKind::Object,
            ) else {
                tracing::warn!(
                    "Room {} instance {} has no object, dropping it",
                    room_name,
                    instance.instance_id
                );
                continue;
            };

            let inst_name = self
                .registry
                .unique_name(TargetKind::Room, &instance_raw_name(instance.instance_id));

            if instance.has_creation_code {
                let rel = join_relative([dir, instance_code_file(&inst_name).as_str()]);
                self.emit_code(
                    CodeOwner::InstanceCreation {
                        room: index,
                        instance_id: instance.instance_id,
                    },
                    &rel,
                )?;
            }

            order.push(InstanceRef {
                name: inst_name.clone(),
                path: room_path.clone(),
            });
            instances.push(InstanceDocument {
                name: inst_name,
                object_id: object,
                x: instance.x,
                y: instance.y,
                scale_x: instance.scale_x,
                scale_y: instance.scale_y,
                rotation: instance.rotation,
                colour: instance.color,
                has_creation_code: instance.has_creation_code,
                inherit_code: false,
                image_index: 0,
                image_speed: 1.0,
                resource_type: "GMRInstance",
                resource_version: RESOURCE_VERSION,
            });
        }

        let layer = InstanceLayer {
            instances,
            common: layer("Instances".to_string(), 0),
        };
        Ok((layer, order))
    }

    fn background_layers(&mut self, graph: &SourceGraph, room: &Room) -> Vec<Layer> {
        let mut layers = Vec::new();
        if room.draw_background_color {
            layers.push(Layer::Background(BackgroundLayer {
                sprite_id: None,
                colour: room.background_color | OPAQUE_BLACK,
                x: 0,
                y: 0,
                htiled: false,
                vtiled: false,
                hspeed: 0,
                vspeed: 0,
                stretch: false,
                common: layer("Background".to_string(), 2000),
            }));
        }

        for (i, bg) in room.backgrounds.iter().enumerate().filter(|(_, bg)| bg.enabled) {
            let sprite = match bg.background {
                Some(b) if graph.backgrounds.get(b).is_some_and(|s| s.image.is_none()) => {
                    tracing::warn!("Background #{} has no image, leaving its layer empty", b);
                    None
                }
                _ => self.registry.resolve_index(
                    graph,
                    SourceKind::Background,
                    bg.background,
                    TargetKind::Sprite,
                ),
            };
            layers.push(Layer::Background(BackgroundLayer {
                sprite_id: sprite,
                colour: u32::MAX,
                x: bg.x,
                y: bg.y,
                htiled: bg.tile_x,
                vtiled: bg.tile_y,
                hspeed: bg.speed_x,
                vspeed: bg.speed_y,
                stretch: bg.stretch,
                common: layer(format!("Background_{}", i), background_depth(i, bg.foreground)),
            }));
        }
        layers
    }

    fn tile_layers(&mut self, graph: &SourceGraph, room: &Room) -> Vec<Layer> {
        room.tile_layers
            .iter()
            .enumerate()
            .map(|(i, tile_layer)| {
                let tileset = match tile_layer.background {
                    Some(b) if graph.backgrounds.get(b).is_some_and(|s| s.tiles.is_none()) => {
                        tracing::warn!("Background #{} has no tile info, leaving the tileset empty", b);
                        None
                    }
                    _ => self.registry.resolve_index(
                        graph,
                        SourceKind::Background,
                        tile_layer.background,
                        TargetKind::TileSet,
                    ),
                };
                let (columns, rows) = tile_layer
                    .background
                    .and_then(|b| graph.backgrounds.get(b))
                    .and_then(|bg| bg.tiles)
                    .filter(|t| t.tile_width > 0 && t.tile_height > 0)
                    .map(|t| (room.width / t.tile_width, room.height / t.tile_height))
                    .unwrap_or((0, 0));

                Layer::Tiles(TileLayerDocument {
                    tileset_id: tileset,
                    x: 0,
                    y: 0,
                    tiles: TileGrid {
                        serialise_width: columns,
                        serialise_height: rows,
                        tile_serialise_data: Vec::new(),
                    },
                    common: layer(format!("Tiles_{}", i), tile_layer.depth),
                })
            })
            .collect()
    }

    fn convert_view(&mut self, graph: &SourceGraph, view: &RoomView) -> ViewDocument {
        ViewDocument {
            inherit: false,
            visible: view.enabled,
            xview: view.x,
            yview: view.y,
            wview: view.width,
            hview: view.height,
            xport: view.port_x,
            yport: view.port_y,
            wport: view.port_width,
            hport: view.port_height,
            hborder: 32,
            vborder: 32,
            hspeed: -1,
            vspeed: -1,
            object_id: self.registry.resolve_index(
                graph,
                SourceKind::Object,
                view.follow,
                TargetKind::Object,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_names() {
        assert_eq!(instance_raw_name(100_001), "inst_186A1");
        assert_eq!(instance_code_file("inst_186A1"), "InstanceCreationCode_inst_186A1.gml");
    }

    #[test]
    fn test_background_depths() {
        assert_eq!(background_depth(0, false), 1000);
        assert_eq!(background_depth(2, false), 1200);
        assert!(background_depth(0, true) < 0);
        assert_eq!(background_depth(usize::MAX, false), i32::MAX);
        assert_eq!(background_depth(usize::MAX, true), i32::MIN);
    }

    #[test]
    fn test_layers_are_tagged_by_type() {
        let tiles = Layer::Tiles(TileLayerDocument {
            tileset_id: None,
            x: 0,
            y: 0,
            tiles: TileGrid {
                serialise_width: 4,
                serialise_height: 3,
                tile_serialise_data: Vec::new(),
            },
            common: layer("Tiles_0".to_string(), 100),
        });
        let json = serde_json::to_value(&tiles).unwrap();
        assert_eq!(json["resourceType"], "GMRTileLayer");
        assert_eq!(json["name"], "Tiles_0");
        assert_eq!(json["tiles"]["SerialiseWidth"], 4);
        assert!(json["tilesetId"].is_null());
    }
}
