//! Directory walking for digiarchive.
//!
//! Bulk operations (duplicate detection, organization, reporting) all start
//! from the same walk: a serial jwalk traversal whose entries are sorted by
//! name within each directory, so every run over an unchanged tree visits
//! files in the same order.
//!
//! Unreadable entries never abort a walk. They are collected as
//! [`FileFailure`]s next to the files that were found.
//!
//! # Example
//!
//! ```rust,no_run
//! use digiarchive_scan::{FileWalker, WalkConfig};
//!
//! let output = FileWalker::new().walk(&WalkConfig::new("/path/to/archive")).unwrap();
//! for file in &output.files {
//!     println!("{} ({} bytes)", file.path.display(), file.size);
//! }
//! for failure in &output.failures {
//!     eprintln!("skipped {failure}");
//! }
//! ```

mod walker;

pub use walker::{FileWalker, WalkOutput, WalkedFile, list_files_by_type};

// Re-export core types for convenience
pub use digiarchive_core::{ArchiveError, FileFailure, WalkConfig, WalkConfigBuilder};
