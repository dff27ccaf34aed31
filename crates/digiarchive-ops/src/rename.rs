//! Rename-with-ID.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use digiarchive_core::{ArchiveError, Result};

/// Rename `stem.ext` to `stem_<id>.ext` in the same directory.
///
/// Fails if the source is missing, the resulting name is not a valid file
/// name, or a file already exists at the new path.
pub fn rename_with_id(path: impl AsRef<Path>, id: &str) -> Result<PathBuf> {
    let path = path.as_ref();
    let meta = fs::symlink_metadata(path).map_err(|e| ArchiveError::io(path, e))?;
    if meta.is_dir() {
        return Err(ArchiveError::invalid(format!(
            "'{}' is a directory",
            path.display()
        )));
    }

    let id = id.trim();
    if id.is_empty() {
        return Err(ArchiveError::invalid("ID must be non-empty"));
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let new_name = match path.extension() {
        Some(ext) => format!("{stem}_{id}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{id}"),
    };
    validate_filename(&new_name)?;

    let parent = path.parent().unwrap_or(Path::new(""));
    let new_path = parent.join(&new_name);
    if new_path.exists() {
        return Err(ArchiveError::invalid(format!("'{new_name}' already exists")));
    }

    fs::rename(path, &new_path).map_err(|e| ArchiveError::io(path, e))?;
    debug!(from = %path.display(), to = %new_path.display(), "renamed with id");
    Ok(new_path)
}

/// Validate a file name for cross-platform safety.
pub fn validate_filename(name: &str) -> Result<()> {
    let reject = |reason: &str| Err(ArchiveError::invalid(format!("invalid file name '{name}': {reason}")));

    if name.is_empty() {
        return reject("name cannot be empty");
    }
    if name.len() > 255 {
        return reject("name is too long (max 255 characters)");
    }
    if name.contains('/') || name.contains('\0') {
        return reject("name contains invalid characters");
    }

    const WINDOWS_INVALID: &[char] = &['\\', ':', '*', '?', '"', '<', '>', '|'];
    if name.contains(WINDOWS_INVALID) {
        return reject("name contains characters not allowed on Windows");
    }

    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
        "COM8", "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    let base = name.split('.').next().unwrap_or(name);
    if RESERVED.iter().any(|r| r.eq_ignore_ascii_case(base)) {
        return reject("name is reserved on Windows");
    }

    if name != name.trim() {
        return reject("name cannot start or end with spaces");
    }
    if name == "." || name == ".." {
        return reject("name cannot be '.' or '..'");
    }
    if name.ends_with('.') {
        return reject("name cannot end with a period");
    }

    Ok(())
}
