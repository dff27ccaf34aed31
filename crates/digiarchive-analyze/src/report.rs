//! Plain-text archive summary reports.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use digiarchive_core::{
    ArchiveError, FileFailure, FileMetadata, Result, WalkConfig, format_file_size,
};
use digiarchive_scan::FileWalker;

/// Bucket name for files without an extension.
pub const UNKNOWN_TYPE: &str = "unknown";

/// Configuration for report generation.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct ReportConfig {
    /// Number of largest files to list.
    #[builder(default = "5")]
    pub top_n: usize,

    /// Include hidden files (starting with .).
    #[builder(default = "true")]
    pub include_hidden: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            include_hidden: true,
        }
    }
}

impl ReportConfig {
    /// Create a new config builder.
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }
}

/// One entry of the largest-files list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LargestFile {
    pub path: PathBuf,
    pub size: u64,
}

/// Summary of an archive directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveReport {
    /// Directory that was summarized.
    pub root: PathBuf,
    /// When the report was generated.
    pub generated_at: DateTime<Local>,
    /// Number of files whose metadata could be read.
    pub total_files: u64,
    /// Combined size of those files.
    pub total_size: u64,
    /// File count per extension, keyed by extension (or `unknown`).
    pub by_type: BTreeMap<String, u64>,
    /// File count per creation month (`YYYY-MM`).
    pub by_month: BTreeMap<String, u64>,
    /// Largest files, size descending then path ascending.
    pub largest: Vec<LargestFile>,
    /// Files skipped because they could not be read.
    pub failures: Vec<FileFailure>,
}

impl ArchiveReport {
    /// Render the plain-text report.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ArchiveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Archive Report: {}", self.root.display())?;
        writeln!(f, "Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f)?;
        writeln!(f, "Total Files: {}", self.total_files)?;
        writeln!(f, "Total Size: {}", format_file_size(self.total_size))?;

        writeln!(f)?;
        writeln!(f, "Files by Type:")?;
        for (ext, count) in &self.by_type {
            writeln!(f, "  {ext}: {count}")?;
        }

        writeln!(f)?;
        writeln!(f, "Files by Creation Month:")?;
        for (month, count) in &self.by_month {
            writeln!(f, "  {month}: {count}")?;
        }

        writeln!(f)?;
        writeln!(f, "Top {} Largest Files:", self.largest.len())?;
        for file in &self.largest {
            writeln!(f, "  {} ({})", file.path.display(), format_file_size(file.size))?;
        }

        if !self.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skipped Files: {}", self.failures.len())?;
            for failure in &self.failures {
                writeln!(f, "  {failure}")?;
            }
        }

        Ok(())
    }
}

/// Builds [`ArchiveReport`]s from a directory walk.
pub struct ReportGenerator {
    config: ReportConfig,
}

impl ReportGenerator {
    /// Create a generator with default config (top 5).
    pub fn new() -> Self {
        Self {
            config: ReportConfig::default(),
        }
    }

    /// Create a generator with custom config.
    pub fn with_config(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Summarize every regular file under `directory`.
    pub fn generate(&self, directory: impl AsRef<Path>) -> Result<ArchiveReport> {
        let directory = directory.as_ref();
        let walk_config = WalkConfig {
            include_hidden: self.config.include_hidden,
            ..WalkConfig::new(directory)
        };
        let walk = FileWalker::new().walk(&walk_config)?;

        let mut report = ArchiveReport {
            root: directory.to_path_buf(),
            generated_at: Local::now(),
            total_files: 0,
            total_size: 0,
            by_type: BTreeMap::new(),
            by_month: BTreeMap::new(),
            largest: Vec::new(),
            failures: walk.failures,
        };

        for file in walk.files {
            let meta = match FileMetadata::extract(&file.path) {
                Ok(m) => m,
                Err(err) => {
                    warn!(path = %file.path.display(), error = %err, "skipping file in report");
                    report.failures.push(FileFailure::read(&file.path, &err));
                    continue;
                }
            };

            report.total_files += 1;
            report.total_size += meta.size_bytes;

            let ext = if meta.extension.is_empty() {
                UNKNOWN_TYPE.to_string()
            } else {
                meta.extension.clone()
            };
            *report.by_type.entry(ext).or_default() += 1;
            *report
                .by_month
                .entry(meta.created_at.format("%Y-%m").to_string())
                .or_default() += 1;

            report.largest.push(LargestFile {
                path: file.path,
                size: meta.size_bytes,
            });
        }

        report
            .largest
            .sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
        report.largest.truncate(self.config.top_n);

        Ok(report)
    }

    /// Generate a report and write its text form to `output`.
    pub fn write_report(
        &self,
        directory: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<ArchiveReport> {
        let output = output.as_ref();
        let report = self.generate(directory)?;
        fs::write(output, report.render()).map_err(|e| ArchiveError::io(output, e))?;
        info!(output = %output.display(), files = report.total_files, "report written");
        Ok(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}
