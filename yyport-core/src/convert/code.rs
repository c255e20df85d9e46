//! GML text emission
//!
//! Writes decompiled code units and flags calls to functions the target
//! engine no longer provides.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use regex::Regex;

use super::Converter;
use crate::report::ManualStep;
use crate::source::CodeOwner;

/// Finds calls to functions listed in the configuration
#[derive(Debug, Default)]
pub struct CodeScanner {
    patterns: Vec<Regex>,
}

impl CodeScanner {
    /// Compile the configured fragments; invalid ones are skipped with a warning
    pub fn new(fragments: &[String]) -> Self {
        let patterns = fragments
            .iter()
            .filter_map(|fragment| {
                match Regex::new(&format!(r"\b({})\s*\(", fragment)) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        tracing::warn!("Ignoring invalid function pattern {:?}: {}", fragment, e);
                        None
                    }
                }
            })
            .collect();
        Self { patterns }
    }

    /// Distinct function names called in `text`, sorted
    pub fn scan(&self, text: &str) -> Vec<String> {
        let mut hits = BTreeSet::new();
        for re in &self.patterns {
            for caps in re.captures_iter(text) {
                if let Some(name) = caps.get(1) {
                    hits.insert(name.as_str().to_string());
                }
            }
        }
        hits.into_iter().collect()
    }
}

/// Comment block listing incompatible calls
pub fn incompatibility_header(functions: &[String]) -> String {
    let mut header = String::from("// yyport: calls to functions removed in GameMaker Studio 2\n");
    for function in functions {
        header.push_str("//   ");
        header.push_str(function);
        header.push('\n');
    }
    header.push('\n');
    header
}

impl<'a> Converter<'a> {
    /// Write one code unit to `rel`, falling back to the configured placeholder
    pub(crate) fn emit_code(&mut self, owner: CodeOwner, rel: &str) -> Result<()> {
        let text = match self.source.find_decompiled_text(&owner) {
            Some(text) => text,
            None => {
                tracing::warn!("No decompiled code for {}, writing a placeholder", rel);
                self.report.missing_code += 1;
                self.config.code.missing_placeholder.clone()
            }
        };

        let functions = self.scanner.scan(&text);
        let text = if functions.is_empty() {
            text
        } else {
            tracing::debug!("{} calls {}", rel, functions.join(", "));
            let annotated = if self.config.code.annotate_incompatible {
                format!("{}{}", incompatibility_header(&functions), text)
            } else {
                text
            };
            self.report.record_manual(ManualStep::ReviewCode {
                file: rel.to_string(),
                functions,
            });
            annotated
        };

        self.output
            .write_text(rel, &text)
            .with_context(|| format!("Failed to write {}", rel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_finds_calls_only() {
        let scanner = CodeScanner::new(&[r"sound_\w+".to_string(), "execute_string".to_string()]);
        let text = "sound_play(snd_jump);\nvar sound_volume = 3;\nexecute_string (\"x\");\nsound_play(snd_hit);";
        assert_eq!(scanner.scan(text), vec!["execute_string", "sound_play"]);
    }

    #[test]
    fn test_scan_respects_word_boundaries() {
        let scanner = CodeScanner::new(&[r"tile_\w+".to_string()]);
        assert!(scanner.scan("my_tile_add(1);").is_empty());
        assert_eq!(scanner.scan("tile_add(bg, 0, 0);"), vec!["tile_add"]);
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let scanner = CodeScanner::new(&["(".to_string(), "d3d_start".to_string()]);
        assert_eq!(scanner.scan("d3d_start();"), vec!["d3d_start"]);
    }

    #[test]
    fn test_header_lists_functions() {
        let header = incompatibility_header(&["sound_play".to_string()]);
        assert!(header.starts_with("// yyport:"));
        assert!(header.contains("//   sound_play\n"));
        assert!(header.ends_with("\n\n"));
    }
}
