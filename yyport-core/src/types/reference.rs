//! Identities and reference descriptors

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::kind::TargetKind;
use crate::path_utils::join_relative;

/// File extension of per-resource descriptor documents
pub const DESCRIPTOR_EXTENSION: &str = "yy";

/// File extension of the top-level project manifest
pub const MANIFEST_EXTENSION: &str = "yyp";

/// Final name and opaque id assigned to one resource, once per run
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub name: String,
    pub id: Uuid,
}

/// A resolved reference to another resource.
///
/// Descriptors hold `Option<ResourceRef>`; `None` is the explicit "no
/// reference" value and serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub name: String,
    pub path: String,
    #[serde(skip)]
    pub id: Uuid,
}

impl ResourceRef {
    pub fn new(kind: TargetKind, identity: &Identity) -> Self {
        Self {
            name: identity.name.clone(),
            path: resource_path(kind, &identity.name),
            id: identity.id,
        }
    }
}

/// Resource key of a final name: `<kind-folder>/<name>`
pub fn resource_key(kind: TargetKind, name: &str) -> String {
    format!("{}/{}", kind.folder(), name)
}

/// Returns true if `name` is the synthetic default group of `kind`
pub fn is_default_group(kind: TargetKind, name: &str) -> bool {
    kind.default_group() == Some(name)
}

/// Project-relative path of a resource's descriptor.
///
/// `<folder>/<name>/<name>.yy`, except the default groups which live flat at
/// `<folder>/<name>.yy`, and included files which are the data file itself.
pub fn resource_path(kind: TargetKind, name: &str) -> String {
    let file = format!("{}.{}", name, DESCRIPTOR_EXTENSION);
    if kind == TargetKind::IncludedFile {
        join_relative([kind.folder(), name])
    } else if is_default_group(kind, name) {
        join_relative([kind.folder(), file.as_str()])
    } else {
        join_relative([kind.folder(), name, file.as_str()])
    }
}

/// Project-relative directory owning a resource's artifacts
pub fn resource_dir(kind: TargetKind, name: &str) -> String {
    join_relative([kind.folder(), name])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_path_shapes() {
        assert_eq!(resource_path(TargetKind::Sprite, "spr_a"), "sprites/spr_a/spr_a.yy");
        assert_eq!(
            resource_path(TargetKind::TextureGroup, "Default"),
            "texturegroups/Default.yy"
        );
        assert_eq!(
            resource_path(TargetKind::AudioGroup, "audiogroup_default"),
            "audiogroups/audiogroup_default.yy"
        );
        assert_eq!(
            resource_path(TargetKind::AudioGroup, "audiogroup_music"),
            "audiogroups/audiogroup_music/audiogroup_music.yy"
        );
        assert_eq!(resource_path(TargetKind::IncludedFile, "save.ini"), "datafiles/save.ini");
    }

    #[test]
    fn test_reference_serializes_name_and_path_only() {
        let identity = Identity {
            name: "obj_player".to_string(),
            id: Uuid::new_v4(),
        };
        let reference = ResourceRef::new(TargetKind::Object, &identity);
        let json = serde_json::to_value(&reference).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "obj_player", "path": "objects/obj_player/obj_player.yy"})
        );

        let absent: Option<ResourceRef> = None;
        assert_eq!(serde_json::to_value(absent).unwrap(), serde_json::Value::Null);
    }
}
