//! Directory dumps produced by an upstream extractor
//!
//! ```text
//! <dump>/graph.json | graph.yaml
//! <dump>/code/<owner-key>.gml
//! <dump>/textures/<handle>.png
//! <dump>/blobs/<blob-key>.bin
//! ```
//!
//! Only the graph file is required. Anything else that is missing reads as
//! "absent".

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use super::{BlobRef, CodeOwner, SourceData, SourceGraph, TextureHandle};

/// Errors that can occur when opening a dump
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to read source dump: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse graph.json: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse graph.yaml: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("No graph.json or graph.yaml found in {0}")]
    GraphNotFound(String),
}

/// A [`SourceData`] backed by a dump directory
#[derive(Debug)]
pub struct DumpSource {
    root: PathBuf,
    graph: SourceGraph,
}

impl DumpSource {
    /// Open a dump directory and parse its graph file
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, SourceError> {
        let root = root.as_ref().to_path_buf();
        let graph = load_graph(&root)?;
        Ok(Self { root, graph })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn code_path(&self, owner: &CodeOwner) -> PathBuf {
        self.root.join("code").join(format!("{}.gml", owner.dump_key()))
    }

    fn texture_path(&self, handle: TextureHandle) -> PathBuf {
        self.root.join("textures").join(format!("{}.png", handle.0))
    }

    fn blob_path(&self, blob: &BlobRef) -> PathBuf {
        self.root.join("blobs").join(format!("{}.bin", blob.dump_key()))
    }
}

/// Find and parse the graph file of a dump
pub fn load_graph(root: &Path) -> Result<SourceGraph, SourceError> {
    let json_path = root.join("graph.json");
    if json_path.exists() {
        let content = fs::read_to_string(&json_path)?;
        return Ok(serde_json::from_str(&content)?);
    }

    for name in ["graph.yaml", "graph.yml"] {
        let yaml_path = root.join(name);
        if yaml_path.exists() {
            let content = fs::read_to_string(&yaml_path)?;
            return Ok(serde_yaml::from_str(&content)?);
        }
    }

    Err(SourceError::GraphNotFound(root.display().to_string()))
}

impl SourceData for DumpSource {
    fn graph(&self) -> &SourceGraph {
        &self.graph
    }

    fn find_decompiled_text(&self, owner: &CodeOwner) -> Option<String> {
        fs::read_to_string(self.code_path(owner)).ok()
    }

    fn render_subimage(&self, handle: TextureHandle) -> Option<RgbaImage> {
        let path = self.texture_path(handle);
        if !path.exists() {
            return None;
        }
        match image::open(&path) {
            Ok(img) => Some(img.to_rgba8()),
            Err(e) => {
                tracing::warn!("Unreadable texture {}: {}", path.display(), e);
                None
            }
        }
    }

    fn raw_bytes(&self, blob: &BlobRef) -> Option<Vec<u8>> {
        fs::read(self.blob_path(blob)).ok()
    }
}
