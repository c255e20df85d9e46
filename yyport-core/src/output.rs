//! Output tree
//!
//! Owns the project root on disk. Preparing the root is the only destructive
//! step of a run and happens once, before any conversion work. Every path the
//! run creates is recorded so a caller can clean up after a fatal error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use serde::Serialize;

use crate::error::ConvertError;

#[derive(Debug)]
pub struct OutputTree {
    root: PathBuf,
    created: Vec<PathBuf>,
}

impl OutputTree {
    /// Prepare `root` for a fresh project.
    ///
    /// An existing non-empty root is removed only when `overwrite` is set;
    /// the caller is expected to have confirmed that with the user.
    pub fn prepare<P: AsRef<Path>>(root: P, overwrite: bool) -> Result<Self, ConvertError> {
        let root = root.as_ref().to_path_buf();

        if root.exists() && !is_empty_dir(&root) {
            if !overwrite {
                return Err(ConvertError::OutputNotEmpty(root));
            }
            tracing::info!("Removing existing output at {}", root.display());
            let removed = if root.is_dir() {
                fs::remove_dir_all(&root)
            } else {
                fs::remove_file(&root)
            };
            removed.map_err(|source| ConvertError::RemoveExisting {
                path: root.clone(),
                source,
            })?;
        }

        fs::create_dir_all(&root).map_err(|source| ConvertError::CreateRoot {
            path: root.clone(),
            source,
        })?;

        Ok(Self {
            root,
            created: Vec::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a project-relative path
    pub fn abs(&self, rel: &str) -> PathBuf {
        rel.split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }

    /// Paths created during this run, in creation order
    pub fn created(&self) -> &[PathBuf] {
        &self.created
    }

    /// Create a project-relative directory (and its parents)
    pub fn create_dir(&mut self, rel: &str) -> io::Result<PathBuf> {
        let path = self.abs(rel);
        if !path.exists() {
            fs::create_dir_all(&path)?;
            self.created.push(path.clone());
        }
        Ok(path)
    }

    fn prepare_file(&mut self, rel: &str) -> io::Result<PathBuf> {
        let path = self.abs(rel);
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
                self.created.push(parent.to_path_buf());
            }
        }
        self.created.push(path.clone());
        Ok(path)
    }

    pub fn write_bytes(&mut self, rel: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.prepare_file(rel)?;
        fs::write(path, bytes)
    }

    pub fn write_text(&mut self, rel: &str, text: &str) -> io::Result<()> {
        self.write_bytes(rel, text.as_bytes())
    }

    /// Serialize a document as pretty JSON
    pub fn write_json<T: Serialize>(&mut self, rel: &str, value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.write_text(rel, &json)
    }

    /// Encode an image as PNG
    pub fn write_png(&mut self, rel: &str, img: &RgbaImage) -> io::Result<()> {
        let path = self.prepare_file(rel)?;
        img.save_with_format(&path, image::ImageFormat::Png)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
