//! Objects
//!
//! One `.gml` file per event. Collision events carry the other object as
//! their subtype, so that subtype resolves as an object reference.

use std::collections::HashSet;

use anyhow::Result;
use serde::Serialize;

use super::Converter;
use crate::path_utils::join_relative;
use crate::source::CodeOwner;
use crate::types::{
    resource_dir, Identity, ResourceHeader, ResourceRef, SourceKind, TargetKind, RESOURCE_VERSION,
};

/// Event type of collision events
pub const COLLISION_EVENT: u32 = 4;

const EVENT_NAMES: [&str; 15] = [
    "Create",
    "Destroy",
    "Alarm",
    "Step",
    "Collision",
    "Keyboard",
    "Mouse",
    "Other",
    "Draw",
    "KeyPress",
    "KeyRelease",
    "Trigger",
    "CleanUp",
    "Gesture",
    "PreCreate",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ObjectDocument {
    sprite_id: Option<ResourceRef>,
    solid: bool,
    visible: bool,
    sprite_mask_id: Option<ResourceRef>,
    persistent: bool,
    parent_object_id: Option<ResourceRef>,
    physics_object: bool,
    event_list: Vec<EventDocument>,
    #[serde(flatten)]
    header: ResourceHeader,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventDocument {
    is_dn_d: bool,
    event_num: u32,
    event_type: u32,
    collision_object_id: Option<ResourceRef>,
    resource_type: &'static str,
    resource_version: &'static str,
}

/// Display name of an event type
pub fn event_name(event_type: u32) -> String {
    EVENT_NAMES
        .get(event_type as usize)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("Event{}", event_type))
}

/// File stem of an event's code file, e.g. `Step_0` or `Collision_obj_wall`
pub fn event_file_stem(event_type: u32, subtype: u32, collision_with: Option<&str>) -> String {
    match collision_with {
        Some(other) if event_type == COLLISION_EVENT => format!("Collision_{}", other),
        _ => format!("{}_{}", event_name(event_type), subtype),
    }
}

impl<'a> Converter<'a> {
    pub(crate) fn convert_objects(&mut self) {
        self.run_phase(TargetKind::Object, SourceKind::Object, Self::convert_object);
    }

    fn convert_object(&mut self, index: usize, identity: &Identity) -> Result<()> {
        let graph = self.graph();
        let object = &graph.objects[index];
        let name = &identity.name;
        let dir = resource_dir(TargetKind::Object, name);

        let sprite =
            self.registry
                .resolve_index(graph, SourceKind::Sprite, object.sprite, TargetKind::Sprite);
        let mask =
            self.registry
                .resolve_index(graph, SourceKind::Sprite, object.mask, TargetKind::Sprite);
        let parent =
            self.registry
                .resolve_index(graph, SourceKind::Object, object.parent, TargetKind::Object);

        let mut written = HashSet::new();
        let mut event_list = Vec::with_capacity(object.events.len());
        for event in &object.events {
            let collision = if event.event_type == COLLISION_EVENT {
                self.registry.resolve_index(
                    graph,
                    SourceKind::Object,
                    Some(event.subtype as usize),
                    TargetKind::Object,
                )
            } else {
                None
            };

            let stem = event_file_stem(
                event.event_type,
                event.subtype,
                collision.as_ref().map(|r| r.name.as_str()),
            );
            if !written.insert(stem.clone()) {
                tracing::warn!("Object {} has a duplicate {} event, skipping it", name, stem);
                continue;
            }

            let rel = join_relative([dir.as_str(), format!("{}.gml", stem).as_str()]);
            self.emit_code(
                CodeOwner::ObjectEvent {
                    object: index,
                    event_type: event.event_type,
                    subtype: event.subtype,
                },
                &rel,
            )?;

            event_list.push(EventDocument {
                is_dn_d: false,
                event_num: if collision.is_some() { 0 } else { event.subtype },
                event_type: event.event_type,
                collision_object_id: collision,
                resource_type: "GMEvent",
                resource_version: RESOURCE_VERSION,
            });
        }

        let document = ObjectDocument {
            sprite_id: sprite,
            solid: object.solid,
            visible: object.visible,
            sprite_mask_id: mask,
            persistent: object.persistent,
            parent_object_id: parent,
            physics_object: object.physics,
            event_list,
            header: ResourceHeader::new(TargetKind::Object, name),
        };
        self.write_descriptor(TargetKind::Object, name, &document)?;
        self.register(TargetKind::Object, identity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_file_stems() {
        assert_eq!(event_file_stem(0, 0, None), "Create_0");
        assert_eq!(event_file_stem(3, 2, None), "Step_2");
        assert_eq!(event_file_stem(8, 64, None), "Draw_64");
        assert_eq!(event_file_stem(COLLISION_EVENT, 5, Some("obj_wall")), "Collision_obj_wall");
        // An unresolvable collision target keeps its index
        assert_eq!(event_file_stem(COLLISION_EVENT, 5, None), "Collision_5");
        assert_eq!(event_file_stem(99, 1, None), "Event99_1");
    }
}
