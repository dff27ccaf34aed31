//! JWalk-based sorted directory walker.

use std::fs;
use std::path::{Path, PathBuf};

use jwalk::{Parallelism, WalkDir};
use tracing::{debug, warn};

use digiarchive_core::{ArchiveError, FailureKind, FileFailure, Result, WalkConfig};

/// A regular file found during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    /// Full path (root joined with the relative path).
    pub path: PathBuf,
    /// Size in bytes at walk time.
    pub size: u64,
    /// Depth below the root (direct children are 1).
    pub depth: usize,
}

/// Everything a walk produced.
#[derive(Debug, Clone, Default)]
pub struct WalkOutput {
    /// Regular files in traversal order.
    pub files: Vec<WalkedFile>,
    /// Number of directories visited below the root.
    pub dirs_visited: u64,
    /// Entries that could not be read.
    pub failures: Vec<FileFailure>,
}

impl WalkOutput {
    /// Paths of all files, in traversal order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.path.as_path())
    }

    /// Total bytes across all files.
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Serial walker with deterministic ordering.
///
/// Traversal is depth-first and the entries of every directory are sorted by
/// file name, so the order equals lexicographic order of path components.
/// Symbolic links are reported neither as files nor followed unless the
/// config asks for it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileWalker;

impl FileWalker {
    /// Create a new walker.
    pub fn new() -> Self {
        Self
    }

    /// Walk the configured root and collect its regular files.
    pub fn walk(&self, config: &WalkConfig) -> Result<WalkOutput> {
        let root = config.root.as_path();
        let root_metadata = fs::metadata(root).map_err(|e| ArchiveError::io(root, e))?;
        if !root_metadata.is_dir() {
            return Err(ArchiveError::invalid(format!(
                "not a directory: {}",
                root.display()
            )));
        }

        let filter = config.clone();
        let walker = WalkDir::new(root)
            .parallelism(Parallelism::Serial)
            .sort(true)
            .skip_hidden(!config.include_hidden)
            .follow_links(config.follow_symlinks)
            .min_depth(1)
            .max_depth(config.max_depth.map(|d| d as usize).unwrap_or(usize::MAX))
            .process_read_dir(move |_depth, _path, _state, children| {
                // Prune ignored names so their subtrees are never read.
                children.retain(|child| match child {
                    Ok(entry) => !filter.should_ignore(&entry.file_name.to_string_lossy()),
                    Err(_) => true,
                });
            });

        let mut output = WalkOutput::default();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                    let kind = match err.io_error().map(|e| e.kind()) {
                        Some(std::io::ErrorKind::PermissionDenied) => FailureKind::PermissionDenied,
                        Some(std::io::ErrorKind::NotFound) => FailureKind::NotFound,
                        _ => FailureKind::ReadError,
                    };
                    warn!(path = %path.display(), error = %err, "skipping unreadable entry");
                    output.failures.push(FileFailure::new(path, err.to_string(), kind));
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                output.dirs_visited += 1;
                continue;
            }
            if !file_type.is_file() {
                debug!(path = %entry.path().display(), "skipping non-regular entry");
                continue;
            }

            let path = entry.path();
            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "metadata unavailable");
                    output
                        .failures
                        .push(FileFailure::new(&path, err.to_string(), FailureKind::ReadError));
                    continue;
                }
            };

            output.files.push(WalkedFile {
                size: metadata.len(),
                depth: entry.depth(),
                path,
            });
        }

        debug!(
            root = %root.display(),
            files = output.files.len(),
            dirs = output.dirs_visited,
            failures = output.failures.len(),
            "walk complete"
        );

        Ok(output)
    }
}

/// List files under `directory` whose names end with `file_type`
/// (case-insensitive), e.g. `.pdf`.
pub fn list_files_by_type(directory: impl AsRef<Path>, file_type: &str) -> Result<Vec<PathBuf>> {
    let suffix = file_type.to_lowercase();
    let output = FileWalker::new().walk(&WalkConfig::new(directory.as_ref()))?;

    Ok(output
        .files
        .into_iter()
        .filter(|f| {
            f.path
                .file_name()
                .is_some_and(|n| n.to_string_lossy().to_lowercase().ends_with(&suffix))
        })
        .map(|f| f.path)
        .collect())
}
