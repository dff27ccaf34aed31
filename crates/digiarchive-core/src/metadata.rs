//! File metadata snapshots.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::{ArchiveError, Result};

/// Immutable snapshot of a file's attributes, taken at extraction time.
///
/// The snapshot is never refreshed; if the file changes afterwards, extract
/// it again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// File name (final path component).
    pub name: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Lowercase extension including the leading dot, or empty.
    pub extension: String,
    /// Containing directory.
    pub folder: PathBuf,
    /// Creation time, or the modification time where the platform has none.
    pub created_at: DateTime<Local>,
    /// Last modification time.
    pub modified_at: DateTime<Local>,
}

impl FileMetadata {
    /// Read the metadata of an existing regular file.
    pub fn extract(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|e| ArchiveError::io(path, e))?;

        if !metadata.is_file() {
            return Err(ArchiveError::invalid(format!(
                "not a regular file: {}",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let modified = metadata.modified().unwrap_or(UNIX_EPOCH);
        let created = metadata.created().unwrap_or(modified);

        Ok(Self {
            extension: file_extension(&name),
            name,
            size_bytes: metadata.len(),
            folder: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            created_at: DateTime::<Local>::from(created),
            modified_at: DateTime::<Local>::from(modified),
        })
    }

    /// Full path of the file this snapshot was taken from.
    pub fn path(&self) -> PathBuf {
        self.folder.join(&self.name)
    }

    /// Render a field as a single folder-name-friendly value.
    ///
    /// Returns `None` when the field is empty (e.g. no extension).
    pub fn field_value(&self, field: MetadataField) -> Option<String> {
        let value = match field {
            MetadataField::Extension => self.extension.trim_start_matches('.').to_string(),
            MetadataField::Created => self.created_at.format("%Y-%m").to_string(),
            MetadataField::Modified => self.modified_at.format("%Y-%m").to_string(),
            MetadataField::Folder => self
                .folder
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            MetadataField::Name => self.name.clone(),
        };

        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

/// Metadata keys that can drive organization and validation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MetadataField {
    /// File extension; `type` is accepted as a synonym.
    #[strum(to_string = "extension", serialize = "type")]
    Extension,
    /// Creation month (`YYYY-MM`).
    Created,
    /// Modification month (`YYYY-MM`).
    Modified,
    /// Name of the containing directory.
    Folder,
    /// File name.
    Name,
}

impl MetadataField {
    /// Parse a field name, rejecting anything outside the supported set.
    pub fn parse(name: &str) -> Result<Self> {
        name.trim().parse().map_err(|_| {
            let supported: Vec<String> = Self::iter().map(|f| f.to_string()).collect();
            ArchiveError::invalid(format!(
                "unsupported metadata field '{name}' (expected one of: type, {})",
                supported.join(", ")
            ))
        })
    }
}

/// Extract metadata for a single file.
pub fn extract_metadata(path: impl AsRef<Path>) -> Result<FileMetadata> {
    FileMetadata::extract(path)
}

/// Extension of a file name: everything from the last `.`, lowercased.
///
/// Empty when the name contains no `.`.
pub fn file_extension(name: &str) -> String {
    name.rfind('.')
        .map(|idx| name[idx..].to_lowercase())
        .unwrap_or_default()
}

/// Check that every listed field has a non-empty value.
pub fn validate_metadata_fields(metadata: &FileMetadata, fields: &[MetadataField]) -> bool {
    fields
        .iter()
        .all(|field| metadata.field_value(*field).is_some())
}

/// Check whether a path's extension is in the allowed set (case-insensitive).
///
/// With `None`, the allowed set is `.pdf`, `.jpg` and `.png`.
pub fn validate_file_format(path: impl AsRef<Path>, allowed: Option<&[&str]>) -> bool {
    let defaults: &[&str] = &[".pdf", ".jpg", ".png"];

    let name = path.as_ref().to_string_lossy().to_lowercase();
    allowed
        .unwrap_or(defaults)
        .iter()
        .any(|ext| name.ends_with(&ext.to_lowercase()))
}
