//! Fields every descriptor document starts with

use serde::{Deserialize, Serialize};

use super::kind::TargetKind;
use crate::path_utils::join_relative;

/// Version tag written into every descriptor
pub const RESOURCE_VERSION: &str = "1.0";

/// Reference to an IDE folder node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRef {
    pub name: String,
    pub path: String,
}

impl FolderRef {
    /// The top-level folder listing `kind`
    pub fn for_kind(kind: TargetKind) -> Self {
        let name = kind.display_name();
        Self {
            name: name.to_string(),
            path: join_relative(["folders", format!("{}.yy", name).as_str()]),
        }
    }
}

/// Common head of a descriptor document, flattened into each kind's struct
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceHeader {
    pub resource_type: String,
    pub resource_version: String,
    pub name: String,
    pub parent: FolderRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ResourceHeader {
    pub fn new(kind: TargetKind, name: &str) -> Self {
        Self {
            resource_type: kind.resource_type().to_string(),
            resource_version: RESOURCE_VERSION.to_string(),
            name: name.to_string(),
            parent: FolderRef::for_kind(kind),
            tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_ref() {
        let folder = FolderRef::for_kind(TargetKind::TileSet);
        assert_eq!(folder.name, "Tile Sets");
        assert_eq!(folder.path, "folders/Tile Sets.yy");
    }

    #[test]
    fn test_header_serialization() {
        let header = ResourceHeader::new(TargetKind::Script, "scr_init");
        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(json["resourceType"], "GMScript");
        assert_eq!(json["name"], "scr_init");
        assert_eq!(json["parent"]["path"], "folders/Scripts.yy");
        assert!(json.get("tags").is_none());
    }
}
