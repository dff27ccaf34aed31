//! Metadata-driven organization into subfolders.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use digiarchive_core::{
    ArchiveError, FileFailure, FileMetadata, MetadataField, Result, WalkConfig,
};
use digiarchive_scan::FileWalker;

use crate::conflict::{sanitize_component, unique_destination};
use crate::move_op::move_file;

/// Folder for files whose field value is empty.
pub const FALLBACK_BUCKET: &str = "unknown";

/// Configuration for organize runs.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct OrganizeConfig {
    /// Include hidden files (starting with .).
    #[builder(default = "true")]
    pub include_hidden: bool,

    /// Folder used when the field has no value.
    #[builder(default = "FALLBACK_BUCKET.to_string()")]
    pub fallback_bucket: String,

    /// Names to leave untouched.
    #[builder(default)]
    pub ignore_patterns: Vec<String>,
}

impl Default for OrganizeConfig {
    fn default() -> Self {
        Self {
            include_hidden: true,
            fallback_bucket: FALLBACK_BUCKET.to_string(),
            ignore_patterns: Vec::new(),
        }
    }
}

impl OrganizeConfig {
    /// Create a new config builder.
    pub fn builder() -> OrganizeConfigBuilder {
        OrganizeConfigBuilder::default()
    }
}

/// A completed move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedFile {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Outcome of an organize run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizeReport {
    /// Field the files were grouped by.
    pub field: MetadataField,
    /// Files that were moved, in traversal order.
    pub moved: Vec<MovedFile>,
    /// Files already in their target folder.
    pub unchanged: u64,
    /// Files that could not be read or moved.
    pub failures: Vec<FileFailure>,
}

impl OrganizeReport {
    /// Check if every file ended up where it belongs.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable summary.
    pub fn summary(&self) -> String {
        if self.failures.is_empty() {
            format!(
                "Moved {} files by '{}' ({} already in place)",
                self.moved.len(),
                self.field,
                self.unchanged
            )
        } else {
            format!(
                "Moved {} files by '{}' ({} already in place), {} failed",
                self.moved.len(),
                self.field,
                self.unchanged,
                self.failures.len()
            )
        }
    }
}

/// One file waiting to be moved.
struct PlannedMove {
    /// Path the walk reported.
    from: PathBuf,
    /// Current location, which differs from `from` once set aside.
    source: PathBuf,
    name: String,
    target_dir: PathBuf,
}

/// Moves files into `<directory>/<field value>/`.
pub struct FileOrganizer {
    config: OrganizeConfig,
}

impl FileOrganizer {
    /// Create an organizer with default config.
    pub fn new() -> Self {
        Self {
            config: OrganizeConfig::default(),
        }
    }

    /// Create an organizer with custom config.
    pub fn with_config(config: OrganizeConfig) -> Self {
        Self { config }
    }

    /// Organize by a field given by name (`extension`, `type`, `created`, ...).
    ///
    /// The field name is validated before any file is touched.
    pub fn organize(&self, directory: impl AsRef<Path>, field: &str) -> Result<OrganizeReport> {
        let field = MetadataField::parse(field)?;
        self.organize_by(directory, field)
    }

    /// Organize every regular file under `directory` by `field`.
    ///
    /// Files already inside their target folder stay put, so a second run
    /// moves nothing. Per-file failures are collected and the run continues.
    pub fn organize_by(&self, directory: impl AsRef<Path>, field: MetadataField) -> Result<OrganizeReport> {
        let directory = directory.as_ref();
        let fallback = sanitize_component(&self.config.fallback_bucket);
        if fallback.is_empty() {
            return Err(ArchiveError::invalid("fallback bucket name must be non-empty"));
        }

        let walk_config = WalkConfig {
            include_hidden: self.config.include_hidden,
            ignore_patterns: self.config.ignore_patterns.clone(),
            ..WalkConfig::new(directory)
        };
        // The full listing is taken before the first move so moved files are
        // never visited twice.
        let walk = FileWalker::new().walk(&walk_config)?;

        let mut report = OrganizeReport {
            field,
            moved: Vec::new(),
            unchanged: 0,
            failures: walk.failures,
        };

        let mut plan = Vec::new();
        for file in walk.files {
            let path = file.path;
            let meta = match FileMetadata::extract(&path) {
                Ok(m) => m,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "cannot read metadata");
                    report.failures.push(FileFailure::read(&path, &err));
                    continue;
                }
            };

            let bucket = meta
                .field_value(field)
                .map(|v| sanitize_component(&v))
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| fallback.clone());
            let target_dir = directory.join(&bucket);

            if path.parent() == Some(target_dir.as_path()) {
                report.unchanged += 1;
                continue;
            }

            plan.push(PlannedMove {
                source: path.clone(),
                from: path,
                name: meta.name,
                target_dir,
            });
        }

        self.clear_bucket_paths(&mut plan, &mut report);

        for entry in plan {
            match self.relocate(&entry.source, &entry.target_dir, &entry.name) {
                Ok(dest) => {
                    debug!(from = %entry.from.display(), to = %dest.display(), "moved");
                    report.moved.push(MovedFile {
                        from: entry.from,
                        to: dest,
                    });
                }
                Err(err) => {
                    warn!(path = %entry.from.display(), error = %err, "cannot move file");
                    report.failures.push(FileFailure::write(&entry.from, &err));
                }
            }
        }

        info!(root = %directory.display(), "{}", report.summary());
        Ok(report)
    }

    /// Rename aside any planned file sitting where a bucket folder must go.
    ///
    /// The set-aside file still moves to its own bucket afterwards. After this
    /// pass every bucket path is free before the first folder is created.
    fn clear_bucket_paths(&self, plan: &mut Vec<PlannedMove>, report: &mut OrganizeReport) {
        let buckets: HashSet<PathBuf> = plan.iter().map(|e| e.target_dir.clone()).collect();

        plan.retain_mut(|entry| {
            if !buckets.contains(&entry.source) {
                return true;
            }
            let aside = unique_destination(&entry.source);
            match move_file(&entry.source, &aside) {
                Ok(_) => {
                    debug!(
                        path = %entry.source.display(),
                        aside = %aside.display(),
                        "file occupies a bucket path, set aside"
                    );
                    entry.source = aside;
                    true
                }
                Err(err) => {
                    warn!(path = %entry.from.display(), error = %err, "cannot clear bucket path");
                    report.failures.push(FileFailure::write(&entry.from, &err));
                    false
                }
            }
        });
    }

    fn relocate(&self, source: &Path, target_dir: &Path, name: &str) -> Result<PathBuf> {
        fs::create_dir_all(target_dir).map_err(|e| ArchiveError::io(target_dir, e))?;
        let dest = unique_destination(&target_dir.join(name));
        move_file(source, &dest)?;
        Ok(dest)
    }
}

impl Default for FileOrganizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Organize with the default configuration.
pub fn organize(directory: impl AsRef<Path>, field: &str) -> Result<OrganizeReport> {
    FileOrganizer::new().organize(directory, field)
}
