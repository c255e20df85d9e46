//! Paths

use anyhow::Result;
use serde::Serialize;

use super::Converter;
use crate::source::graph::PathPoint;
use crate::types::{Identity, ResourceHeader, SourceKind, TargetKind};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PathDocument {
    /// 0 straight lines, 1 smooth curve
    kind: u32,
    closed: bool,
    precision: u32,
    points: Vec<PointDocument>,
    #[serde(flatten)]
    header: ResourceHeader,
}

#[derive(Debug, Serialize)]
struct PointDocument {
    speed: f32,
    x: f32,
    y: f32,
}

impl From<&PathPoint> for PointDocument {
    fn from(point: &PathPoint) -> Self {
        Self {
            speed: point.speed,
            x: point.x,
            y: point.y,
        }
    }
}

impl<'a> Converter<'a> {
    pub(crate) fn convert_paths(&mut self) {
        self.run_phase(TargetKind::Path, SourceKind::Path, Self::convert_path);
    }

    fn convert_path(&mut self, index: usize, identity: &Identity) -> Result<()> {
        let path = &self.graph().paths[index];
        let document = PathDocument {
            kind: u32::from(path.smooth),
            closed: path.closed,
            precision: path.precision,
            points: path.points.iter().map(PointDocument::from).collect(),
            header: ResourceHeader::new(TargetKind::Path, &identity.name),
        };
        self.write_descriptor(TargetKind::Path, &identity.name, &document)?;
        self.register(TargetKind::Path, identity);
        Ok(())
    }
}
