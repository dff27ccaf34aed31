//! Destination conflict handling.

use std::path::{Path, PathBuf};

/// Return `path` if nothing exists there, otherwise the first free sibling
/// named `stem_1.ext`, `stem_2.ext`, ...
pub fn unique_destination(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let parent = path.parent().unwrap_or(Path::new(""));
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());

    let mut counter: u64 = 1;
    loop {
        let new_name = match &extension {
            Some(ext) => format!("{stem}_{counter}.{ext}"),
            None => format!("{stem}_{counter}"),
        };
        let candidate = parent.join(new_name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Turn a metadata value into a single safe path component.
pub fn sanitize_component(value: &str) -> String {
    let cleaned: String = value
        .trim()
        .chars()
        .map(|c| match c {
            ' ' => '_',
            '/' | '\\' | ':' | '\0' => '-',
            other => other,
        })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => String::new(),
        _ => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_unique_destination_free_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("report.pdf");
        assert_eq!(unique_destination(&path), path);
    }

    #[test]
    fn test_unique_destination_counts_up() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("report.pdf"), "1").unwrap();
        fs::write(temp.path().join("report_1.pdf"), "2").unwrap();

        let renamed = unique_destination(&temp.path().join("report.pdf"));
        assert_eq!(renamed, temp.path().join("report_2.pdf"));
    }

    #[test]
    fn test_unique_destination_no_extension() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("LICENSE"), "x").unwrap();
        assert_eq!(
            unique_destination(&temp.path().join("LICENSE")),
            temp.path().join("LICENSE_1")
        );
    }

    #[test]
    fn test_sanitize_component() {
        assert_eq!(sanitize_component("image/png"), "image-png");
        assert_eq!(sanitize_component("Team Notes"), "Team_Notes");
        assert_eq!(sanitize_component(".."), "");
        assert_eq!(sanitize_component("  "), "");
        assert_eq!(sanitize_component("pdf"), "pdf");
    }
}
