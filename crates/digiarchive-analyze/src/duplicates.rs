//! Duplicate file detection using content checksums.
//!
//! Two-phase algorithm:
//! 1. Group files by size; a file with a unique size cannot have a duplicate
//! 2. Hash the remaining files and bucket them by digest
//!
//! Buckets keep traversal order, so the first file of each bucket is the
//! original and every later member is reported as its duplicate.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use derive_builder::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use digiarchive_core::{
    ArchiveError, FileFailure, HashAlgorithm, Result, WalkConfig, compute_checksum,
};
use digiarchive_scan::{FileWalker, WalkedFile};

/// Configuration for duplicate detection.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct DuplicateConfig {
    /// Checksum algorithm used to compare content.
    #[builder(default)]
    pub algorithm: HashAlgorithm,

    /// Include hidden files (starting with .).
    #[builder(default = "true")]
    pub include_hidden: bool,

    /// Minimum file size to consider.
    #[builder(default = "0")]
    pub min_size: u64,

    /// Skip hashing files whose size no other file shares.
    #[builder(default = "true")]
    pub size_prefilter: bool,

    /// Names to skip during the walk.
    #[builder(default)]
    pub ignore_patterns: Vec<String>,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            include_hidden: true,
            min_size: 0,
            size_prefilter: true,
            ignore_patterns: Vec::new(),
        }
    }
}

impl DuplicateConfig {
    /// Create a new config builder.
    pub fn builder() -> DuplicateConfigBuilder {
        DuplicateConfigBuilder::default()
    }
}

/// One duplicate file and the original it duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicatePair {
    /// First file with this content in traversal order.
    pub original: PathBuf,
    /// A later file with identical content.
    pub duplicate: PathBuf,
    /// Whether the duplicate was deleted.
    pub removed: bool,
}

/// Files sharing one digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Shared hex digest.
    pub digest: String,
    /// Size of each file in bytes.
    pub size: u64,
    /// The file that is kept.
    pub original: PathBuf,
    /// All other members, in traversal order.
    pub duplicates: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Number of files in the group, original included.
    pub fn count(&self) -> usize {
        self.duplicates.len() + 1
    }

    /// Bytes that removing the duplicates would reclaim.
    pub fn wasted_bytes(&self) -> u64 {
        self.size * self.duplicates.len() as u64
    }
}

/// Results from a duplicate scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Duplicate sets, ordered by first appearance of their original.
    pub groups: Vec<DuplicateGroup>,
    /// One `(original, duplicate)` pair per duplicate.
    pub pairs: Vec<DuplicatePair>,
    /// Regular files found by the walk.
    pub files_scanned: u64,
    /// Files that were actually hashed.
    pub files_hashed: u64,
    /// Total reclaimable bytes.
    pub wasted_bytes: u64,
    /// Files that could not be hashed or deleted. Unreadable files take no
    /// part in matching; they are listed here instead of being treated as
    /// unique.
    pub failures: Vec<FileFailure>,
}

impl DuplicateReport {
    /// Check if any duplicates were found.
    pub fn has_duplicates(&self) -> bool {
        !self.pairs.is_empty()
    }

    /// Pairs as plain `(original, duplicate)` tuples.
    pub fn as_tuples(&self) -> Vec<(PathBuf, PathBuf)> {
        self.pairs
            .iter()
            .map(|p| (p.original.clone(), p.duplicate.clone()))
            .collect()
    }

    /// Number of duplicates deleted.
    pub fn removed_count(&self) -> usize {
        self.pairs.iter().filter(|p| p.removed).count()
    }
}

/// Duplicate file detector.
pub struct DuplicateDetector {
    config: DuplicateConfig,
}

impl DuplicateDetector {
    /// Create a detector with default config (sha256, every file).
    pub fn new() -> Self {
        Self {
            config: DuplicateConfig::default(),
        }
    }

    /// Create a detector with custom config.
    pub fn with_config(config: DuplicateConfig) -> Self {
        Self { config }
    }

    /// Find duplicates under `directory`, deleting them when `remove` is set.
    ///
    /// Only a missing or non-directory root is fatal. Per-file read and
    /// delete errors are collected in [`DuplicateReport::failures`].
    pub fn find_duplicates(&self, directory: impl AsRef<Path>, remove: bool) -> Result<DuplicateReport> {
        let directory = directory.as_ref();
        let walk_config = WalkConfig {
            include_hidden: self.config.include_hidden,
            ignore_patterns: self.config.ignore_patterns.clone(),
            ..WalkConfig::new(directory)
        };
        let walk = FileWalker::new().walk(&walk_config)?;

        let mut report = DuplicateReport {
            files_scanned: walk.files.len() as u64,
            failures: walk.failures,
            ..Default::default()
        };

        let candidates = self.candidates(walk.files);
        let buckets = self.bucket_by_digest(candidates, &mut report);

        for (digest, mut members) in buckets {
            if members.len() < 2 {
                continue;
            }
            let (original, size) = members.remove(0);
            let duplicates: Vec<PathBuf> = members.into_iter().map(|(path, _)| path).collect();

            for duplicate in &duplicates {
                let removed = remove && self.remove_duplicate(duplicate, &mut report);
                report.pairs.push(DuplicatePair {
                    original: original.clone(),
                    duplicate: duplicate.clone(),
                    removed,
                });
            }

            let group = DuplicateGroup {
                digest,
                size,
                original,
                duplicates,
            };
            report.wasted_bytes += group.wasted_bytes();
            report.groups.push(group);
        }

        info!(
            root = %directory.display(),
            scanned = report.files_scanned,
            pairs = report.pairs.len(),
            removed = report.removed_count(),
            failures = report.failures.len(),
            "duplicate scan complete"
        );

        Ok(report)
    }

    /// Apply size filters, keeping traversal order.
    fn candidates(&self, files: Vec<WalkedFile>) -> Vec<WalkedFile> {
        let files: Vec<WalkedFile> = files
            .into_iter()
            .filter(|f| f.size >= self.config.min_size)
            .collect();

        if !self.config.size_prefilter {
            return files;
        }

        let mut size_counts: HashMap<u64, usize> = HashMap::new();
        for file in &files {
            *size_counts.entry(file.size).or_default() += 1;
        }
        files
            .into_iter()
            .filter(|f| size_counts[&f.size] > 1)
            .collect()
    }

    /// Hash each candidate and group by digest in first-seen order.
    fn bucket_by_digest(
        &self,
        files: Vec<WalkedFile>,
        report: &mut DuplicateReport,
    ) -> IndexMap<String, Vec<(PathBuf, u64)>> {
        let mut buckets: IndexMap<String, Vec<(PathBuf, u64)>> = IndexMap::new();

        for file in files {
            match compute_checksum(&file.path, self.config.algorithm) {
                Ok(sum) => {
                    report.files_hashed += 1;
                    debug!(path = %file.path.display(), digest = %sum.digest, "hashed");
                    buckets
                        .entry(sum.digest)
                        .or_default()
                        .push((file.path, file.size));
                }
                Err(err) => {
                    warn!(path = %file.path.display(), error = %err, "cannot hash file");
                    report.failures.push(FileFailure::read(&file.path, &err));
                }
            }
        }

        buckets
    }

    /// Delete one duplicate, recording a failure instead of aborting.
    fn remove_duplicate(&self, path: &Path, report: &mut DuplicateReport) -> bool {
        match fs::remove_file(path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed duplicate");
                true
            }
            Err(e) => {
                let err = ArchiveError::io(path, e);
                warn!(path = %path.display(), error = %err, "cannot remove duplicate");
                report.failures.push(FileFailure::write(path, &err));
                false
            }
        }
    }
}

impl Default for DuplicateDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Find duplicates with the default configuration.
pub fn find_duplicates(directory: impl AsRef<Path>, remove: bool) -> Result<DuplicateReport> {
    DuplicateDetector::new().find_duplicates(directory, remove)
}
