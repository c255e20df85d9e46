//! Fonts
//!
//! The glyph atlas is copied as-is and the font is flagged for regeneration,
//! since the target engine rebuilds atlases from the typeface.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

use super::Converter;
use crate::path_utils::join_relative;
use crate::report::ManualStep;
use crate::source::graph::Glyph;
use crate::types::{resource_dir, Identity, ResourceHeader, ResourceRef, SourceKind, TargetKind};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FontDocument {
    font_name: String,
    style_name: &'static str,
    size: f32,
    bold: bool,
    italic: bool,
    first: u32,
    last: u32,
    texture_group_id: Option<ResourceRef>,
    glyphs: BTreeMap<u32, GlyphDocument>,
    ranges: Vec<GlyphRange>,
    regenerate_bitmap: bool,
    maintain_gms1_font: bool,
    #[serde(flatten)]
    header: ResourceHeader,
}

#[derive(Debug, Serialize)]
struct GlyphDocument {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    character: u32,
    shift: i32,
    offset: i32,
}

impl From<&Glyph> for GlyphDocument {
    fn from(glyph: &Glyph) -> Self {
        Self {
            x: glyph.x,
            y: glyph.y,
            w: glyph.width,
            h: glyph.height,
            character: glyph.character,
            shift: glyph.shift,
            offset: glyph.offset,
        }
    }
}

#[derive(Debug, Serialize)]
struct GlyphRange {
    lower: u32,
    upper: u32,
}

fn style_name(bold: bool, italic: bool) -> &'static str {
    match (bold, italic) {
        (true, true) => "Bold Italic",
        (true, false) => "Bold",
        (false, true) => "Italic",
        (false, false) => "Regular",
    }
}

impl<'a> Converter<'a> {
    pub(crate) fn convert_fonts(&mut self) {
        self.run_phase(TargetKind::Font, SourceKind::Font, Self::convert_font);
    }

    fn convert_font(&mut self, index: usize, identity: &Identity) -> Result<()> {
        let graph = self.graph();
        let font = &graph.fonts[index];
        let name = &identity.name;

        let texture_group = self.registry.resolve_group(
            graph,
            SourceKind::TextureGroup,
            font.texture_group,
            TargetKind::TextureGroup,
        );

        match font.atlas.and_then(|handle| self.source.render_subimage(handle)) {
            Some(atlas) => {
                let file = format!("{}.png", name);
                let rel = join_relative([resource_dir(TargetKind::Font, name).as_str(), file.as_str()]);
                self.output.write_png(&rel, &atlas)?;
            }
            None => tracing::warn!("Font {} has no atlas image", name),
        }

        let (first, last) = if font.glyphs.is_empty() {
            (font.first_char, font.last_char)
        } else {
            let chars = font.glyphs.iter().map(|g| g.character);
            (chars.clone().min().unwrap_or(0), chars.max().unwrap_or(0))
        };

        let document = FontDocument {
            font_name: font.font_name.clone().unwrap_or_else(|| "Arial".to_string()),
            style_name: style_name(font.bold, font.italic),
            size: font.size,
            bold: font.bold,
            italic: font.italic,
            first,
            last,
            texture_group_id: texture_group,
            glyphs: font
                .glyphs
                .iter()
                .map(|g| (g.character, GlyphDocument::from(g)))
                .collect(),
            ranges: vec![GlyphRange {
                lower: first,
                upper: last,
            }],
            regenerate_bitmap: false,
            maintain_gms1_font: true,
            header: ResourceHeader::new(TargetKind::Font, name),
        };
        self.write_descriptor(TargetKind::Font, name, &document)?;
        self.register(TargetKind::Font, identity);
        self.report
            .record_manual(ManualStep::RegenerateFont { font: name.clone() });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_name() {
        assert_eq!(style_name(false, false), "Regular");
        assert_eq!(style_name(true, true), "Bold Italic");
    }

    #[test]
    fn test_glyphs_serialize_keyed_by_character() {
        let glyph = Glyph {
            character: 65,
            width: 7,
            height: 9,
            shift: 8,
            ..Default::default()
        };
        let glyphs: BTreeMap<u32, GlyphDocument> = [(65, GlyphDocument::from(&glyph))].into();
        let json = serde_json::to_value(&glyphs).unwrap();
        assert_eq!(json["65"]["w"], 7);
        assert_eq!(json["65"]["shift"], 8);
    }
}
