//! Conversion report
//!
//! Collected during a run and printed by the CLI as the final summary.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::types::TargetKind;

/// A resource the run could not convert
#[derive(Debug, Clone, Serialize)]
pub struct SkippedResource {
    pub kind: TargetKind,
    pub name: String,
    pub reason: String,
}

/// Follow-up work the converted project needs by hand
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum ManualStep {
    /// Tile layers were recreated empty
    PaintTiles { room: String, layers: usize, tiles: u64 },
    /// Font atlas was copied but the font must be regenerated from a typeface
    RegenerateFont { font: String },
    /// Extension binaries are not embedded in the data file
    RestoreExtension { extension: String },
    /// Code calls functions the target engine no longer has
    ReviewCode { file: String, functions: Vec<String> },
}

impl fmt::Display for ManualStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManualStep::PaintTiles { room, layers, tiles } => write!(
                f,
                "Repaint {} tile(s) in {} tile layer(s) of room {}",
                tiles, layers, room
            ),
            ManualStep::RegenerateFont { font } => {
                write!(f, "Regenerate font {} from its typeface", font)
            }
            ManualStep::RestoreExtension { extension } => {
                write!(f, "Copy the binaries of extension {} into the project", extension)
            }
            ManualStep::ReviewCode { file, functions } => {
                write!(f, "Review {}: uses {}", file, functions.join(", "))
            }
        }
    }
}

#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReport {
    /// Registered resources per kind
    pub converted: BTreeMap<TargetKind, usize>,
    pub skipped: Vec<SkippedResource>,
    /// Names of resources the assembler had to invent
    pub synthetic: Vec<String>,
    pub manual_steps: Vec<ManualStep>,
    /// Code units written with placeholder text
    pub missing_code: usize,
    /// Frames written as placeholder images
    pub placeholder_frames: usize,
}

impl ConversionReport {
    pub fn record_converted(&mut self, kind: TargetKind) {
        *self.converted.entry(kind).or_insert(0) += 1;
    }

    pub fn record_skipped(&mut self, kind: TargetKind, name: &str, reason: String) {
        self.skipped.push(SkippedResource {
            kind,
            name: name.to_string(),
            reason,
        });
    }

    pub fn record_manual(&mut self, step: ManualStep) {
        self.manual_steps.push(step);
    }

    pub fn converted_count(&self, kind: TargetKind) -> usize {
        self.converted.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_converted(&self) -> usize {
        self.converted.values().sum()
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Converted {} resource(s):", self.total_converted())?;
        for (kind, count) in &self.converted {
            writeln!(f, "  {:<14} {}", kind.display_name(), count)?;
        }

        if !self.synthetic.is_empty() {
            writeln!(
                f,
                "\nCreated {} synthetic resource(s): {}",
                self.synthetic.len(),
                self.synthetic.join(", ")
            )?;
        }

        if !self.skipped.is_empty() {
            writeln!(f, "\nSkipped {} resource(s):", self.skipped.len())?;
            for skipped in &self.skipped {
                writeln!(f, "  {} {}: {}", skipped.kind, skipped.name, skipped.reason)?;
            }
        }

        if self.missing_code > 0 {
            writeln!(f, "\n{} code block(s) had no decompiled text", self.missing_code)?;
        }
        if self.placeholder_frames > 0 {
            writeln!(f, "{} frame(s) were replaced by placeholders", self.placeholder_frames)?;
        }

        if !self.manual_steps.is_empty() {
            writeln!(f, "\nManual follow-up:")?;
            for step in &self.manual_steps {
                writeln!(f, "  - {}", step)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut report = ConversionReport::default();
        report.record_converted(TargetKind::Sprite);
        report.record_converted(TargetKind::Sprite);
        report.record_converted(TargetKind::Room);
        assert_eq!(report.converted_count(TargetKind::Sprite), 2);
        assert_eq!(report.converted_count(TargetKind::Font), 0);
        assert_eq!(report.total_converted(), 3);
    }

    #[test]
    fn test_summary_lists_follow_up() {
        let mut report = ConversionReport::default();
        report.record_converted(TargetKind::Room);
        report.record_skipped(TargetKind::Sprite, "spr_broken", "no image data".into());
        report.record_manual(ManualStep::PaintTiles {
            room: "rm_start".into(),
            layers: 2,
            tiles: 40,
        });
        report.record_manual(ManualStep::ReviewCode {
            file: "scripts/scr_a/scr_a.gml".into(),
            functions: vec!["sound_play".into()],
        });

        let summary = report.to_string();
        assert!(summary.contains("Converted 1 resource(s)"));
        assert!(summary.contains("spr_broken: no image data"));
        assert!(summary.contains("Repaint 40 tile(s) in 2 tile layer(s) of room rm_start"));
        assert!(summary.contains("uses sound_play"));
    }
}
