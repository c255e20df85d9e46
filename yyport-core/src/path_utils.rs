//! Cross-platform path utilities
//!
//! Project-relative paths written into descriptors and the manifest always use
//! forward slashes, regardless of the host platform.

use std::path::Path;

/// Normalize path to forward slashes
#[inline]
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Convert a Path to a normalized string
#[inline]
pub fn path_to_string(path: &Path) -> String {
    normalize_path(&path.to_string_lossy())
}

/// Join project-relative segments with forward slashes
pub fn join_relative<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    segments
        .into_iter()
        .map(|s| normalize_path(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Sanitize a file name for every supported host filesystem.
///
/// Unlike [`crate::sanitize::sanitize`] this keeps dots, dashes and spaces, so it is
/// only used for included files whose name must survive as a file name rather
/// than as a GML identifier.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' | '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = cleaned.trim().trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("sprites\\spr_a\\spr_a.yy"), "sprites/spr_a/spr_a.yy");
        assert_eq!(normalize_path("sprites/spr_a"), "sprites/spr_a");
        assert_eq!(normalize_path(""), "");
    }

    #[test]
    fn test_path_to_string() {
        let path = PathBuf::from("rooms").join("rm_init");
        let result = path_to_string(&path);
        assert_eq!(result, "rooms/rm_init");
    }

    #[test]
    fn test_join_relative() {
        assert_eq!(join_relative(["sprites", "spr_a", "spr_a.yy"]), "sprites/spr_a/spr_a.yy");
        assert_eq!(join_relative(["texturegroups", "", "Default.yy"]), "texturegroups/Default.yy");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("config.ini"), "config.ini");
        assert_eq!(sanitize_filename("save<1>.dat"), "save_1_.dat");
        assert_eq!(sanitize_filename("dir/file.txt"), "dir_file.txt");
        assert_eq!(sanitize_filename(".."), "_");
        assert_eq!(sanitize_filename("   "), "_");
        assert_eq!(sanitize_filename("trailing."), "trailing");
    }
}
