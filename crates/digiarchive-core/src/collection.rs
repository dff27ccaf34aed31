//! Named, ordered groups of archive records.

use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::error::{ArchiveError, Result};
use crate::item::ArchiveItem;
use crate::record::ArchiveRecord;
use crate::util::format_file_size;

/// An ordered group of shared record references.
///
/// Insertion order is preserved and the same record may appear more than
/// once. Duplicate files are a duplicate-detection concern, not a
/// collection invariant.
#[derive(Debug, Clone)]
pub struct ArchiveCollection {
    name: String,
    records: Vec<Arc<ArchiveRecord>>,
    created_at: DateTime<Local>,
}

impl ArchiveCollection {
    /// Create an empty collection. The name must not be blank.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ArchiveError::invalid("collection name must be non-empty"));
        }
        Ok(Self {
            name,
            records: Vec::new(),
            created_at: Local::now(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[Arc<ArchiveRecord>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record, returning the shared handle that was stored.
    pub fn add(&mut self, record: impl Into<Arc<ArchiveRecord>>) -> Arc<ArchiveRecord> {
        let record = record.into();
        self.records.push(Arc::clone(&record));
        record
    }

    /// Remove the first occurrence of exactly this record (by identity).
    pub fn remove(&mut self, record: &Arc<ArchiveRecord>) -> Result<Arc<ArchiveRecord>> {
        let idx = self
            .records
            .iter()
            .position(|r| Arc::ptr_eq(r, record))
            .ok_or_else(|| self.not_found())?;
        Ok(self.records.remove(idx))
    }

    /// Remove every record carrying `id`. Returns how many were removed.
    pub fn remove_by_id(&mut self, id: &str) -> Result<usize> {
        let before = self.records.len();
        self.records.retain(|r| r.unique_id() != Some(id));
        match before - self.records.len() {
            0 => Err(self.not_found()),
            removed => Ok(removed),
        }
    }

    /// Sum of member sizes in bytes.
    pub fn total_size(&self) -> u64 {
        self.records.iter().map(|r| r.metadata().size_bytes).sum()
    }

    /// Records whose author contains `name` (case-insensitive), in order.
    pub fn search_by_author(&self, name: &str) -> Vec<Arc<ArchiveRecord>> {
        let needle = name.to_lowercase();
        self.records
            .iter()
            .filter(|r| {
                r.author()
                    .is_some_and(|a| a.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    /// Records matching `keyword` in name, author or tags, in order.
    pub fn search_by_keyword(&self, keyword: &str) -> Vec<Arc<ArchiveRecord>> {
        self.records
            .iter()
            .filter(|r| r.search(keyword))
            .cloned()
            .collect()
    }

    fn not_found(&self) -> ArchiveError {
        ArchiveError::RecordNotFound {
            collection: self.name.clone(),
        }
    }
}

impl ArchiveItem for ArchiveCollection {
    fn display_info(&self) -> String {
        let mut info = format!(
            "Collection: {}\nRecords: {}\nCreated: {}\nTotal size: {}",
            self.name,
            self.records.len(),
            self.created_at.format("%Y-%m-%d %H:%M:%S"),
            format_file_size(self.total_size()),
        );
        for record in &self.records {
            info.push_str(&format!(
                "\n  - {} ({})",
                record,
                record.author().unwrap_or("Unknown")
            ));
        }
        info
    }

    fn calculate_size(&self) -> u64 {
        self.total_size()
    }
}

impl std::fmt::Display for ArchiveCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} records)", self.name, self.records.len())
    }
}
