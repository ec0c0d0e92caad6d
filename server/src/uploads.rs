//! Upload file naming

use std::path::Path;

/// Extensions accepted by /predict
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

/// Whether the filename ends in an accepted image extension (case-insensitive)
pub fn allowed_file(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| ALLOWED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reduce a client-supplied filename to a safe, flat ASCII name.
///
/// Directory components are dropped, whitespace becomes `_`, characters
/// other than ASCII alphanumerics, `.`, `_` and `-` are removed, and
/// leading/trailing dots and underscores are trimmed.
pub fn secure_filename(filename: &str) -> String {
    let base = filename.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();

    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Stored name for an upload: `{unix_seconds}_{sanitized_name}`
pub fn upload_name(original: &str, timestamp: i64) -> String {
    let safe = secure_filename(original);
    if safe.is_empty() {
        format!("{}_upload", timestamp)
    } else {
        format!("{}_{}", timestamp, safe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_file() {
        assert!(allowed_file("lesion.JPG"));
        assert!(allowed_file("scan.bmp"));
        assert!(!allowed_file("notes.txt"));
        assert!(!allowed_file("jpg"));
        assert!(!allowed_file(""));
    }

    #[test]
    fn test_secure_filename_strips_paths() {
        assert_eq!(secure_filename("../../etc/passwd"), "passwd");
        assert_eq!(secure_filename("C:\\Users\\me\\arm.png"), "arm.png");
    }

    #[test]
    fn test_secure_filename_replaces_whitespace() {
        assert_eq!(secure_filename("my skin photo.jpg"), "my_skin_photo.jpg");
        assert_eq!(secure_filename("ünïcode.png"), "ncode.png");
    }

    #[test]
    fn test_upload_name() {
        assert_eq!(upload_name("arm.png", 1700000000), "1700000000_arm.png");
        assert_eq!(upload_name("..", 1700000000), "1700000000_upload");
    }
}
