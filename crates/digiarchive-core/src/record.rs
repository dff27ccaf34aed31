//! A single archived file and its descriptive metadata.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::item::ArchiveItem;
use crate::metadata::FileMetadata;
use crate::util::format_file_size;

/// One managed file: a metadata snapshot plus author, tags and an ID.
///
/// The record refers to the file by path; it does not own it and is never
/// re-synced with the filesystem after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    path: PathBuf,
    metadata: FileMetadata,
    unique_id: Option<String>,
    author: Option<String>,
    tags: Vec<String>,
}

impl ArchiveRecord {
    /// Create a record by extracting metadata from `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = FileMetadata::extract(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            metadata,
            unique_id: None,
            author: None,
            tags: Vec::new(),
        })
    }

    /// Set the author (builder style).
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Add tags (builder style).
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            self.add_tag(tag);
        }
        self
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Metadata snapshot taken at creation.
    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    /// File name.
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Assigned unique ID, if any.
    pub fn unique_id(&self) -> Option<&str> {
        self.unique_id.as_deref()
    }

    /// Author, if known.
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Tags in insertion order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Assign the unique ID. Assigning again replaces the previous value.
    pub fn assign_unique_id(&mut self, id: impl Into<String>) {
        self.unique_id = Some(id.into());
    }

    /// Update the author and append tags.
    ///
    /// `None` leaves the corresponding field untouched.
    pub fn edit_metadata(&mut self, author: Option<String>, tags: Option<Vec<String>>) {
        if let Some(author) = author {
            self.author = Some(author);
        }
        for tag in tags.into_iter().flatten() {
            self.add_tag(tag);
        }
    }

    /// Add a tag. Returns `false` if it was already present or blank.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Case-insensitive substring match against name, author and tags.
    pub fn search(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.metadata.name.to_lowercase().contains(&keyword)
            || self
                .author
                .as_ref()
                .is_some_and(|a| a.to_lowercase().contains(&keyword))
            || self
                .tags
                .iter()
                .any(|t| t.to_lowercase().contains(&keyword))
    }
}

impl ArchiveItem for ArchiveRecord {
    fn display_info(&self) -> String {
        let tags = if self.tags.is_empty() {
            "None".to_string()
        } else {
            self.tags.join(", ")
        };
        let extension = if self.metadata.extension.is_empty() {
            "unknown"
        } else {
            self.metadata.extension.as_str()
        };

        format!(
            "File: {}\nID: {}\nAuthor: {}\nTags: {}\nSize: {}\nType: {}\nCreated: {}\nModified: {}",
            self.metadata.name,
            self.unique_id.as_deref().unwrap_or("unassigned"),
            self.author.as_deref().unwrap_or("Unknown"),
            tags,
            format_file_size(self.metadata.size_bytes),
            extension,
            self.metadata.created_at.format("%Y-%m-%d %H:%M:%S"),
            self.metadata.modified_at.format("%Y-%m-%d %H:%M:%S"),
        )
    }

    fn calculate_size(&self) -> u64 {
        self.metadata.size_bytes
    }
}

impl std::fmt::Display for ArchiveRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({})",
            self.metadata.name,
            format_file_size(self.metadata.size_bytes)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample_record(temp: &TempDir) -> ArchiveRecord {
        let path = temp.path().join("Thesis_Draft.pdf");
        fs::write(&path, "draft contents").unwrap();
        ArchiveRecord::from_path(&path).unwrap()
    }

    #[test]
    fn test_from_path_missing() {
        let temp = TempDir::new().unwrap();
        let err = ArchiveRecord::from_path(temp.path().join("nope.pdf")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_assign_unique_id_is_replaceable() {
        let temp = TempDir::new().unwrap();
        let mut record = sample_record(&temp);
        assert_eq!(record.unique_id(), None);

        record.assign_unique_id("FILE-0001");
        record.assign_unique_id("FILE-0001");
        assert_eq!(record.unique_id(), Some("FILE-0001"));

        record.assign_unique_id("FILE-0002");
        assert_eq!(record.unique_id(), Some("FILE-0002"));
    }

    #[test]
    fn test_edit_metadata() {
        let temp = TempDir::new().unwrap();
        let mut record = sample_record(&temp).with_author("Manasa").with_tags(["research"]);

        record.edit_metadata(None, Some(vec!["final".into(), "research".into()]));
        assert_eq!(record.author(), Some("Manasa"));
        assert_eq!(record.tags(), ["research", "final"]);

        record.edit_metadata(Some("Ade".into()), None);
        assert_eq!(record.author(), Some("Ade"));
        assert!(!record.add_tag("  "));
    }

    #[test]
    fn test_search() {
        let temp = TempDir::new().unwrap();
        let record = sample_record(&temp).with_author("Manasa").with_tags(["Research"]);

        assert!(record.search("thesis"));
        assert!(record.search("MANA"));
        assert!(record.search("search"));
        assert!(record.search(""));
        assert!(!record.search("budget"));
    }

    #[test]
    fn test_item_impl() {
        let temp = TempDir::new().unwrap();
        let record = sample_record(&temp);
        assert_eq!(record.calculate_size(), 14);

        let info = record.display_info();
        assert!(info.contains("File: Thesis_Draft.pdf"));
        assert!(info.contains("Author: Unknown"));
        assert!(info.contains("Type: .pdf"));
        assert_eq!(record.to_string(), "Thesis_Draft.pdf (14 B)");
    }
}
