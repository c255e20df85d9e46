//! Identifier sanitizer
//!
//! Maps arbitrary source names onto identifiers GameMaker accepts as both a
//! resource name and a directory name: ASCII letters, digits and `_`, never a
//! leading digit, never a reserved word.

use rand::Rng;

/// Words the target language reserves. Compared against the lower-cased name.
pub const RESERVED_WORDS: &[&str] = &[
    // keywords
    "if", "then", "else", "begin", "end", "while", "do", "until", "for", "repeat", "switch",
    "case", "default", "break", "continue", "exit", "return", "with", "var", "globalvar",
    "function", "constructor", "new", "delete", "enum", "try", "catch", "finally", "throw",
    "static", "and", "or", "not", "xor", "div", "mod",
    // literals
    "true", "false", "undefined", "pi", "infinity", "nan", "pointer_null", "pointer_invalid",
    // self-references
    "self", "other", "all", "noone", "global", "local",
];

/// Returns true if `name` collides with a reserved word (case-insensitive).
pub fn is_reserved(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    RESERVED_WORDS.contains(&lower.as_str())
}

#[inline]
fn is_legal(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Sanitize a raw source name into a target-safe identifier.
///
/// Total: every input yields a non-empty identifier. Sanitizing an already
/// sanitized name returns it unchanged.
pub fn sanitize(raw: &str) -> String {
    let trimmed = raw.trim();

    let mut out = String::with_capacity(trimmed.len());
    let mut in_illegal_run = false;
    for c in trimmed.chars() {
        if is_legal(c) {
            out.push(c);
            in_illegal_run = false;
        } else if !in_illegal_run {
            out.push('_');
            in_illegal_run = true;
        }
    }

    if out.is_empty() {
        return unnamed();
    }

    if is_reserved(&out) {
        out.push('_');
    }

    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }

    out
}

/// Fallback name for input with nothing usable in it
fn unnamed() -> String {
    let mut rng = rand::thread_rng();
    format!("unnamed_{:08x}", rng.gen::<u32>())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_compliant(name: &str) {
        assert!(!name.is_empty());
        assert!(name.chars().all(is_legal), "illegal character in {name}");
        assert!(!name.starts_with(|c: char| c.is_ascii_digit()), "leading digit in {name}");
        assert!(!is_reserved(name), "reserved word {name}");
    }

    #[test]
    fn test_plain_name_unchanged() {
        assert_eq!(sanitize("spr_player"), "spr_player");
        assert_eq!(sanitize("Idle"), "Idle");
    }

    #[test]
    fn test_illegal_characters_collapse() {
        assert_eq!(sanitize("my sprite"), "my_sprite");
        assert_eq!(sanitize("a?!b"), "a_b");
        assert_eq!(sanitize("  padded  "), "padded");
        assert_eq!(sanitize("héllo"), "h_llo");
        assert_eq!(sanitize("a__b"), "a__b");
    }

    #[test]
    fn test_empty_and_whitespace() {
        let a = sanitize("");
        let b = sanitize("   ");
        assert!(a.starts_with("unnamed_"));
        assert!(b.starts_with("unnamed_"));
        assert_eq!(a.len(), "unnamed_".len() + 8);
        assert_compliant(&a);
        assert_compliant(&b);
    }

    #[test]
    fn test_leading_digit() {
        assert_eq!(sanitize("123abc"), "_123abc");
        assert_compliant(&sanitize("123abc"));
    }

    #[test]
    fn test_reserved_words() {
        assert_eq!(sanitize("self"), "self_");
        assert_eq!(sanitize("TRUE"), "TRUE_");
        assert_eq!(sanitize("Default"), "Default_");
        assert_compliant(&sanitize("self"));
        assert_compliant(&sanitize("all"));
    }

    #[test]
    fn test_idempotent() {
        for raw in ["my sprite", "123abc", "self", "a?!b", "obj_Player", "???"] {
            let once = sanitize(raw);
            assert_eq!(sanitize(&once), once, "not idempotent for {raw:?}");
            assert_compliant(&once);
        }
    }
}
