//! Sounds

use anyhow::Result;
use serde::Serialize;

use super::Converter;
use crate::path_utils::join_relative;
use crate::source::BlobRef;
use crate::types::{resource_dir, Identity, ResourceHeader, ResourceRef, SourceKind, TargetKind};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SoundDocument {
    compression: u32,
    volume: f32,
    pitch: f32,
    preload: bool,
    bit_rate: u32,
    sample_rate: u32,
    bit_depth: u32,
    audio_group_id: Option<ResourceRef>,
    /// Audio file name inside the sound's directory; empty when no data was found
    sound_file: String,
    #[serde(flatten)]
    header: ResourceHeader,
}

/// File extension for audio bytes, from magic bytes first, then the source file name
pub fn audio_extension(data: &[u8], file_name: Option<&str>) -> String {
    if data.starts_with(b"OggS") {
        return "ogg".to_string();
    }
    if data.starts_with(b"RIFF") && data.get(8..12) == Some(b"WAVE".as_slice()) {
        return "wav".to_string();
    }
    if data.starts_with(b"ID3") || (data.len() > 1 && data[0] == 0xFF && data[1] & 0xE0 == 0xE0) {
        return "mp3".to_string();
    }

    file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".to_string())
}

impl<'a> Converter<'a> {
    pub(crate) fn convert_sounds(&mut self) {
        self.run_phase(TargetKind::Sound, SourceKind::Sound, Self::convert_sound);
    }

    fn convert_sound(&mut self, index: usize, identity: &Identity) -> Result<()> {
        let graph = self.graph();
        let sound = &graph.sounds[index];
        let name = &identity.name;

        let audio_group = self.registry.resolve_group(
            graph,
            SourceKind::AudioGroup,
            sound.audio_group,
            TargetKind::AudioGroup,
        );

        let sound_file = match self.source.raw_bytes(&BlobRef::Sound(index)) {
            Some(bytes) => {
                let file = format!("{}.{}", name, audio_extension(&bytes, sound.file_name.as_deref()));
                let rel = join_relative([resource_dir(TargetKind::Sound, name).as_str(), file.as_str()]);
                self.output.write_bytes(&rel, &bytes)?;
                file
            }
            None => {
                tracing::warn!("Sound {} has no audio data, writing the descriptor only", name);
                String::new()
            }
        };

        let document = SoundDocument {
            compression: sound.compression,
            volume: sound.volume,
            pitch: sound.pitch,
            preload: sound.preload,
            bit_rate: 128,
            sample_rate: 44100,
            bit_depth: 1,
            audio_group_id: audio_group,
            sound_file,
            header: ResourceHeader::new(TargetKind::Sound, name),
        };
        self.write_descriptor(TargetKind::Sound, name, &document)?;
        self.register(TargetKind::Sound, identity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_bytes() {
        assert_eq!(audio_extension(b"OggS\0\0\0\0", None), "ogg");
        assert_eq!(audio_extension(b"RIFF\x24\0\0\0WAVEfmt ", Some("a.ogg")), "wav");
        assert_eq!(audio_extension(b"ID3\x03\0", None), "mp3");
        assert_eq!(audio_extension(&[0xFF, 0xFB, 0x90, 0x00], None), "mp3");
    }

    #[test]
    fn test_file_name_fallback() {
        assert_eq!(audio_extension(b"\0\0\0\0", Some("jump.WAV")), "wav");
        assert_eq!(audio_extension(b"\0\0\0\0", Some("noext")), "bin");
        assert_eq!(audio_extension(b"", None), "bin");
    }
}
