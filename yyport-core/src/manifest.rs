//! Manifest assembly
//!
//! Collects every registered resource and builds the `.yyp` project document.
//! `finalize` closes the reference graph: every reference the resolver handed
//! out ends up with exactly one entry in the manifest, inventing a synthetic
//! resource for targets no converter registered.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use uuid::Uuid;

use crate::registry::Registry;
use crate::types::{
    resource_path, FolderRef, Identity, ResourceRef, TargetKind, RESOURCE_VERSION,
};

/// One registered resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub id: Uuid,
    pub name: String,
    pub path: String,
    pub kind: TargetKind,
}

impl ManifestEntry {
    pub fn new(kind: TargetKind, identity: &Identity) -> Self {
        Self {
            id: identity.id,
            name: identity.name.clone(),
            path: resource_path(kind, &identity.name),
            kind,
        }
    }
}

/// Why the assembler had to invent a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SyntheticReason {
    /// A default group no source group stood in for
    DefaultGroup,
    /// Referenced by a converted resource but never registered itself
    MissingTarget,
}

/// A resource invented by the assembler; its descriptor is written with the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticResource {
    pub entry: ManifestEntry,
    pub reason: SyntheticReason,
}

/// Accumulates registrations during a run
#[derive(Debug, Default)]
pub struct ManifestAssembler {
    entries: Vec<ManifestEntry>,
    seen: HashSet<Uuid>,
    buckets: BTreeMap<TargetKind, Vec<Uuid>>,
}

impl ManifestAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource. Returns false (and changes nothing) if `id` is
    /// already present.
    pub fn add_resource(&mut self, name: &str, id: Uuid, path: &str, kind: TargetKind) -> bool {
        if !self.seen.insert(id) {
            return false;
        }
        self.entries.push(ManifestEntry {
            id,
            name: name.to_string(),
            path: path.to_string(),
            kind,
        });
        self.buckets.entry(kind).or_default().push(id);
        true
    }

    /// Register a resource under its standard descriptor path
    pub fn add_identity(&mut self, kind: TargetKind, identity: &Identity) -> bool {
        let entry = ManifestEntry::new(kind, identity);
        self.add_resource(&entry.name, entry.id, &entry.path, kind)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.seen.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the project document
    pub fn finalize(mut self, project_name: &str, registry: &mut Registry) -> Manifest {
        let mut synthetic = Vec::new();

        for kind in TargetKind::ALL {
            if let Some(default) = registry.default_group(kind) {
                if self.add_identity(kind, &default) {
                    tracing::debug!("Created default {} {}", kind, default.name);
                    synthetic.push(SyntheticResource {
                        entry: ManifestEntry::new(kind, &default),
                        reason: SyntheticReason::DefaultGroup,
                    });
                }
            }
        }

        let dangling: Vec<_> = registry
            .issued()
            .iter()
            .filter(|issued| !self.contains(issued.identity.id))
            .cloned()
            .collect();
        for issued in dangling {
            tracing::warn!(
                "{} {} is referenced but was never converted; writing a placeholder",
                issued.kind,
                issued.identity.name
            );
            self.add_identity(issued.kind, &issued.identity);
            synthetic.push(SyntheticResource {
                entry: ManifestEntry::new(issued.kind, &issued.identity),
                reason: SyntheticReason::MissingTarget,
            });
        }

        let entry_ref = |entry: &ManifestEntry| ResourceRef {
            name: entry.name.clone(),
            path: entry.path.clone(),
            id: entry.id,
        };
        let manifest_resource = |entry: &ManifestEntry| ManifestResource {
            id: entry_ref(entry),
            uuid: entry.id,
            parent: FolderRef::for_kind(entry.kind),
        };

        let mut resources = Vec::new();
        let mut audio_groups = Vec::new();
        let mut texture_groups = Vec::new();
        let mut included_files = Vec::new();
        for entry in &self.entries {
            let target = match entry.kind {
                TargetKind::AudioGroup => &mut audio_groups,
                TargetKind::TextureGroup => &mut texture_groups,
                TargetKind::IncludedFile => &mut included_files,
                _ => &mut resources,
            };
            target.push(manifest_resource(entry));
        }

        let folders = TargetKind::ALL
            .iter()
            .enumerate()
            .map(|(order, &kind)| {
                let folder = FolderRef::for_kind(kind);
                FolderNode {
                    resource_type: "GMFolder",
                    resource_version: RESOURCE_VERSION,
                    name: folder.name,
                    folder_path: folder.path,
                    filter_type: kind.resource_type(),
                    order,
                    children: self.buckets.get(&kind).cloned().unwrap_or_default(),
                }
            })
            .collect();

        let room_order_nodes = self
            .entries
            .iter()
            .filter(|entry| entry.kind == TargetKind::Room)
            .map(|entry| RoomOrderNode {
                room_id: entry_ref(entry),
            })
            .collect();

        Manifest {
            resource_type: "GMProject",
            resource_version: RESOURCE_VERSION,
            name: project_name.to_string(),
            resources,
            folders,
            room_order_nodes,
            audio_groups,
            texture_groups,
            included_files,
            synthetic,
        }
    }
}

/// One entry of a manifest resource list
#[derive(Debug, Clone, Serialize)]
pub struct ManifestResource {
    pub id: ResourceRef,
    pub uuid: Uuid,
    pub parent: FolderRef,
}

/// IDE folder node; one per kind, present even when empty
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    pub resource_type: &'static str,
    pub resource_version: &'static str,
    pub name: String,
    pub folder_path: String,
    pub filter_type: &'static str,
    pub order: usize,
    pub children: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOrderNode {
    pub room_id: ResourceRef,
}

/// The project document
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Manifest {
    #[serde(rename = "resourceType")]
    pub resource_type: &'static str,
    #[serde(rename = "resourceVersion")]
    pub resource_version: &'static str,
    #[serde(rename = "name")]
    pub name: String,
    #[serde(rename = "resources")]
    pub resources: Vec<ManifestResource>,
    pub folders: Vec<FolderNode>,
    pub room_order_nodes: Vec<RoomOrderNode>,
    pub audio_groups: Vec<ManifestResource>,
    pub texture_groups: Vec<ManifestResource>,
    pub included_files: Vec<ManifestResource>,
    /// Descriptors the writer must emit next to the manifest
    #[serde(skip)]
    pub synthetic: Vec<SyntheticResource>,
}

impl Manifest {
    /// Every entry across all sections
    pub fn entries(&self) -> impl Iterator<Item = &ManifestResource> {
        self.resources
            .iter()
            .chain(&self.audio_groups)
            .chain(&self.texture_groups)
            .chain(&self.included_files)
    }

    /// How many entries carry `id`
    pub fn count_id(&self, id: Uuid) -> usize {
        self.entries().filter(|e| e.uuid == id).count()
    }

    pub fn folder(&self, kind: TargetKind) -> Option<&FolderNode> {
        let name = kind.display_name();
        self.folders.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceGraph;
    use crate::types::{SourceHandle, SourceKind};

    #[test]
    fn test_add_resource_is_idempotent() {
        let mut assembler = ManifestAssembler::new();
        let id = Uuid::new_v4();
        assert!(assembler.add_resource("spr_a", id, "sprites/spr_a/spr_a.yy", TargetKind::Sprite));
        assert!(!assembler.add_resource("spr_a", id, "sprites/spr_a/spr_a.yy", TargetKind::Sprite));
        assert_eq!(assembler.len(), 1);
    }

    #[test]
    fn test_empty_run_still_has_folders_and_default_groups() {
        let mut registry = Registry::new();
        let manifest = ManifestAssembler::new().finalize("Empty", &mut registry);

        assert_eq!(manifest.folders.len(), TargetKind::ALL.len());
        assert!(manifest.folder(TargetKind::Timeline).unwrap().children.is_empty());
        assert_eq!(manifest.audio_groups.len(), 1);
        assert_eq!(manifest.texture_groups.len(), 1);
        assert_eq!(manifest.texture_groups[0].id.path, "texturegroups/Default.yy");
        assert_eq!(manifest.synthetic.len(), 2);
        assert!(manifest
            .synthetic
            .iter()
            .all(|s| s.reason == SyntheticReason::DefaultGroup));
    }

    #[test]
    fn test_naturally_created_default_group_is_not_duplicated() {
        let mut registry = Registry::new();
        let mut assembler = ManifestAssembler::new();
        let default = registry.default_group(TargetKind::TextureGroup).unwrap();
        assembler.add_identity(TargetKind::TextureGroup, &default);

        let manifest = assembler.finalize("P", &mut registry);
        assert_eq!(manifest.count_id(default.id), 1);
        assert_eq!(manifest.synthetic.len(), 1);
        assert_eq!(manifest.synthetic[0].entry.kind, TargetKind::AudioGroup);
    }

    #[test]
    fn test_dangling_reference_is_closed() {
        let graph = SourceGraph {
            sprites: vec![crate::source::graph::Sprite {
                name: Some("spr_gone".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let mut registry = Registry::new();
        let reference = registry
            .resolve(&graph, Some(SourceHandle::new(SourceKind::Sprite, 0)), TargetKind::Sprite)
            .unwrap();

        let manifest = ManifestAssembler::new().finalize("P", &mut registry);
        assert_eq!(manifest.count_id(reference.id), 1);
        let synthetic = manifest
            .synthetic
            .iter()
            .find(|s| s.entry.id == reference.id)
            .unwrap();
        assert_eq!(synthetic.reason, SyntheticReason::MissingTarget);
        assert_eq!(synthetic.entry.path, "sprites/spr_gone/spr_gone.yy");
    }

    #[test]
    fn test_room_order_follows_registration() {
        let mut registry = Registry::new();
        let mut assembler = ManifestAssembler::new();
        for name in ["rm_title", "rm_game", "rm_end"] {
            let identity = registry.identity(TargetKind::Room, name);
            assembler.add_identity(TargetKind::Room, &identity);
        }
        let manifest = assembler.finalize("P", &mut registry);
        let order: Vec<_> = manifest
            .room_order_nodes
            .iter()
            .map(|n| n.room_id.name.as_str())
            .collect();
        assert_eq!(order, vec!["rm_title", "rm_game", "rm_end"]);
        assert_eq!(manifest.folder(TargetKind::Room).unwrap().children.len(), 3);
    }

    #[test]
    fn test_manifest_serialization_shape() {
        let mut registry = Registry::new();
        let manifest = ManifestAssembler::new().finalize("Demo", &mut registry);
        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["resourceType"], "GMProject");
        assert_eq!(json["name"], "Demo");
        assert!(json["Folders"].is_array());
        assert!(json["RoomOrderNodes"].is_array());
        assert_eq!(json["TextureGroups"][0]["id"]["name"], "Default");
        assert!(json.get("synthetic").is_none());
    }
}
