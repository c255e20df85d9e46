//! Source side of the conversion
//!
//! The data file decoder, the bytecode decompiler and the texture page
//! renderer are external collaborators. The core only sees them through
//! [`SourceData`].

pub mod dump;
pub mod graph;

use std::collections::HashMap;

use image::RgbaImage;

pub use dump::{DumpSource, SourceError};
pub use graph::{SourceGraph, TextureHandle};

/// Owner of one unit of decompiled code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeOwner {
    Script(usize),
    ObjectEvent {
        object: usize,
        event_type: u32,
        subtype: u32,
    },
    RoomCreation(usize),
    InstanceCreation {
        room: usize,
        instance_id: u32,
    },
    TimelineMoment {
        timeline: usize,
        step: u32,
    },
}

impl CodeOwner {
    /// Stable file stem used by dump directories
    pub fn dump_key(&self) -> String {
        match self {
            CodeOwner::Script(i) => format!("script_{i}"),
            CodeOwner::ObjectEvent {
                object,
                event_type,
                subtype,
            } => format!("object_{object}_{event_type}_{subtype}"),
            CodeOwner::RoomCreation(i) => format!("room_{i}"),
            CodeOwner::InstanceCreation { instance_id, .. } => format!("instance_{instance_id}"),
            CodeOwner::TimelineMoment { timeline, step } => format!("timeline_{timeline}_{step}"),
        }
    }
}

/// A raw binary payload owned by a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobRef {
    Sound(usize),
    IncludedFile(usize),
}

impl BlobRef {
    /// Stable file stem used by dump directories
    pub fn dump_key(&self) -> String {
        match self {
            BlobRef::Sound(i) => format!("sound_{i}"),
            BlobRef::IncludedFile(i) => format!("included_{i}"),
        }
    }
}

/// Capabilities the conversion needs from the upstream loader.
///
/// Every lookup may come back empty; that is never an error on this side.
pub trait SourceData {
    /// The parsed object graph
    fn graph(&self) -> &SourceGraph;

    /// Decompiled text of one code unit
    fn find_decompiled_text(&self, owner: &CodeOwner) -> Option<String>;

    /// Render one texture page item to an image
    fn render_subimage(&self, handle: TextureHandle) -> Option<RgbaImage>;

    /// Raw bytes of an embedded blob
    fn raw_bytes(&self, blob: &BlobRef) -> Option<Vec<u8>>;
}

/// A [`SourceData`] held entirely in memory
#[derive(Debug, Default)]
pub struct MemorySource {
    pub graph: SourceGraph,
    pub code: HashMap<CodeOwner, String>,
    pub images: HashMap<TextureHandle, RgbaImage>,
    pub blobs: HashMap<BlobRef, Vec<u8>>,
}

impl MemorySource {
    pub fn new(graph: SourceGraph) -> Self {
        Self {
            graph,
            ..Default::default()
        }
    }

    pub fn with_code(mut self, owner: CodeOwner, text: impl Into<String>) -> Self {
        self.code.insert(owner, text.into());
        self
    }

    pub fn with_image(mut self, handle: TextureHandle, image: RgbaImage) -> Self {
        self.images.insert(handle, image);
        self
    }

    pub fn with_blob(mut self, blob: BlobRef, bytes: Vec<u8>) -> Self {
        self.blobs.insert(blob, bytes);
        self
    }
}

impl SourceData for MemorySource {
    fn graph(&self) -> &SourceGraph {
        &self.graph
    }

    fn find_decompiled_text(&self, owner: &CodeOwner) -> Option<String> {
        self.code.get(owner).cloned()
    }

    fn render_subimage(&self, handle: TextureHandle) -> Option<RgbaImage> {
        self.images.get(&handle).cloned()
    }

    fn raw_bytes(&self, blob: &BlobRef) -> Option<Vec<u8>> {
        self.blobs.get(blob).cloned()
    }
}
