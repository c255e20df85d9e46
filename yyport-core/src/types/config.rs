//! Conversion configuration
//!
//! Defines the optional `yyport.toml` file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name looked up in the working directory when no config path is given
pub const CONFIG_FILE_NAME: &str = "yyport.toml";

/// The main conversion configuration (yyport.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConvertConfig {
    /// Project name override (default: the source game name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,

    /// Placeholder images for frames without image data
    #[serde(default)]
    pub placeholder: PlaceholderConfig,

    /// Script text handling
    #[serde(default)]
    pub code: CodeConfig,
}

/// Placeholder image configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderConfig {
    /// Fill colour as `#RRGGBB` or `#RRGGBBAA`
    #[serde(default = "default_placeholder_color")]
    pub color: String,

    /// Size used when the owning resource has no dimensions
    #[serde(default = "default_placeholder_size")]
    pub width: u32,

    #[serde(default = "default_placeholder_size")]
    pub height: u32,
}

fn default_placeholder_color() -> String {
    "#FF00FF".to_string()
}

fn default_placeholder_size() -> u32 {
    16
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            color: default_placeholder_color(),
            width: default_placeholder_size(),
            height: default_placeholder_size(),
        }
    }
}

impl PlaceholderConfig {
    /// Parse the configured colour, falling back to opaque magenta
    pub fn rgba(&self) -> [u8; 4] {
        parse_hex_color(&self.color).unwrap_or([0xFF, 0x00, 0xFF, 0xFF])
    }
}

/// Script text configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeConfig {
    /// Text written when the decompiler has no text for a code unit
    #[serde(default = "default_missing_placeholder")]
    pub missing_placeholder: String,

    /// Regex fragments naming functions that no longer exist in the target engine
    #[serde(default = "default_incompatible_functions")]
    pub incompatible_functions: Vec<String>,

    /// Prepend a comment listing incompatible calls to each affected file
    #[serde(default = "default_true")]
    pub annotate_incompatible: bool,
}

fn default_missing_placeholder() -> String {
    "/// Decompiled code was not available for this block.\n".to_string()
}

fn default_incompatible_functions() -> Vec<String> {
    vec![
        // Backgrounds became sprites and layers
        r"background_\w+".to_string(),
        r"draw_background\w*".to_string(),
        // Tiles became tilemap layers
        r"tile_\w+".to_string(),
        // Legacy sound system
        r"sound_\w+".to_string(),
        // Views became cameras
        r"view_set_\w+".to_string(),
        // Removed 3D and misc APIs
        r"d3d_\w+".to_string(),
        r"execute_string".to_string(),
        r"execute_file".to_string(),
        r"object_event_add".to_string(),
        r"variable_local_\w+".to_string(),
        r"splash_\w+".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            missing_placeholder: default_missing_placeholder(),
            incompatible_functions: default_incompatible_functions(),
            annotate_incompatible: true,
        }
    }
}

/// Errors that can occur when loading the configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

impl ConvertConfig {
    /// Parse a yyport.toml file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ConvertConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from an explicit path, else `yyport.toml` in `dir`, else defaults
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match find_config(dir) {
                Some(path) => Self::from_file(path),
                None => Ok(Self::default()),
            },
        }
    }
}

/// Find yyport.toml in a directory
pub fn find_config<P: AsRef<Path>>(dir: P) -> Option<PathBuf> {
    let candidate = dir.as_ref().join(CONFIG_FILE_NAME);
    candidate.exists().then_some(candidate)
}

/// Parse `#RRGGBB` / `#RRGGBBAA` (leading `#` optional)
pub fn parse_hex_color(s: &str) -> Option<[u8; 4]> {
    let hex = s.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        6 => Some([byte(0)?, byte(2)?, byte(4)?, 0xFF]),
        8 => Some([byte(0)?, byte(2)?, byte(4)?, byte(6)?]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConvertConfig::default();
        assert!(config.project_name.is_none());
        assert_eq!(config.placeholder.rgba(), [0xFF, 0x00, 0xFF, 0xFF]);
        assert!(!config.code.incompatible_functions.is_empty());
        assert!(config.code.annotate_incompatible);
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_content = r##"
project_name = "Ported"

[placeholder]
color = "#00FF0080"

[code]
incompatible_functions = ["my_old_func"]
"##;
        let config: ConvertConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.project_name.as_deref(), Some("Ported"));
        assert_eq!(config.placeholder.rgba(), [0x00, 0xFF, 0x00, 0x80]);
        assert_eq!(config.placeholder.width, 16);
        assert_eq!(config.code.incompatible_functions, vec!["my_old_func".to_string()]);
        assert!(config.code.missing_placeholder.contains("not available"));
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#102030"), Some([0x10, 0x20, 0x30, 0xFF]));
        assert_eq!(parse_hex_color("10203040"), Some([0x10, 0x20, 0x30, 0x40]));
        assert_eq!(parse_hex_color("#xyz"), None);
        assert_eq!(parse_hex_color("#12345"), None);
    }

    #[test]
    fn test_load_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ConvertConfig::load(None, dir.path()).unwrap();
        assert!(config.project_name.is_none());

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "project_name = \"X\"\n").unwrap();
        let config = ConvertConfig::load(None, dir.path()).unwrap();
        assert_eq!(config.project_name.as_deref(), Some("X"));
    }
}
