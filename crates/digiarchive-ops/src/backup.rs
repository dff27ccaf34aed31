//! Recursive directory backup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use digiarchive_core::{ArchiveError, FileFailure, Result};

/// Outcome of a backup run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Regular files copied.
    pub files_copied: u64,
    /// Directories created under the destination.
    pub dirs_created: u64,
    pub bytes_copied: u64,
    /// Entries that could not be copied.
    pub failures: Vec<FileFailure>,
}

impl BackupReport {
    /// Check if every entry was copied.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Copy the tree at `source` into `destination`, creating it if needed.
///
/// Existing files at the destination are overwritten. Symlinks and other
/// non-regular entries are skipped. A destination inside the source is
/// rejected before anything is copied.
pub fn backup_directory(source: impl AsRef<Path>, destination: impl AsRef<Path>) -> Result<BackupReport> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    let meta = fs::metadata(source).map_err(|e| ArchiveError::io(source, e))?;
    if !meta.is_dir() {
        return Err(ArchiveError::invalid(format!(
            "'{}' is not a directory",
            source.display()
        )));
    }

    let source_abs = fs::canonicalize(source).map_err(|e| ArchiveError::io(source, e))?;
    if resolve(destination)?.starts_with(&source_abs) {
        return Err(ArchiveError::invalid(format!(
            "backup destination '{}' is inside '{}'",
            destination.display(),
            source.display()
        )));
    }

    let mut report = BackupReport {
        source: source.to_path_buf(),
        destination: destination.to_path_buf(),
        ..Default::default()
    };

    if !destination.is_dir() {
        fs::create_dir_all(destination).map_err(|e| ArchiveError::io(destination, e))?;
        report.dirs_created += 1;
    }
    copy_dir_recursive(source, destination, &mut report);

    info!(
        source = %source.display(),
        destination = %destination.display(),
        files = report.files_copied,
        bytes = report.bytes_copied,
        failed = report.failures.len(),
        "backup finished"
    );
    Ok(report)
}

fn copy_dir_recursive(source: &Path, dest: &Path, report: &mut BackupReport) {
    let entries = match fs::read_dir(source) {
        Ok(entries) => entries,
        Err(e) => {
            record_failure(report, FileFailure::read(source, &ArchiveError::io(source, e)));
            return;
        }
    };

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => paths.push(entry.path()),
            Err(e) => record_failure(report, FileFailure::read(source, &ArchiveError::io(source, e))),
        }
    }
    paths.sort();

    for path in paths {
        let Some(name) = path.file_name() else { continue };
        let dest_path = dest.join(name);

        let file_type = match fs::symlink_metadata(&path) {
            Ok(meta) => meta.file_type(),
            Err(e) => {
                record_failure(report, FileFailure::read(&path, &ArchiveError::io(&path, e)));
                continue;
            }
        };

        if file_type.is_dir() {
            if !dest_path.is_dir() {
                if let Err(e) = fs::create_dir(&dest_path) {
                    record_failure(report, FileFailure::write(&path, &ArchiveError::io(&dest_path, e)));
                    continue;
                }
                report.dirs_created += 1;
            }
            copy_dir_recursive(&path, &dest_path, report);
        } else if file_type.is_file() {
            match fs::copy(&path, &dest_path) {
                Ok(bytes) => {
                    debug!(from = %path.display(), to = %dest_path.display(), bytes, "copied");
                    report.files_copied += 1;
                    report.bytes_copied += bytes;
                }
                Err(e) => {
                    record_failure(report, FileFailure::write(&path, &ArchiveError::io(&dest_path, e)));
                }
            }
        } else {
            debug!(path = %path.display(), "skipping non-regular entry");
        }
    }
}

fn record_failure(report: &mut BackupReport, failure: FileFailure) {
    warn!(path = %failure.path.display(), error = %failure.message, "backup entry failed");
    report.failures.push(failure);
}

/// Absolute form of `path`, resolving the longest existing ancestor.
fn resolve(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| ArchiveError::io(path, e))?
            .join(path)
    };

    let mut existing = absolute.as_path();
    let mut rest: Vec<&std::ffi::OsStr> = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name);
                existing = parent;
            }
            _ => break,
        }
    }

    let mut resolved = fs::canonicalize(existing).unwrap_or_else(|_| existing.to_path_buf());
    for name in rest.into_iter().rev() {
        resolved.push(name);
    }
    Ok(resolved)
}
