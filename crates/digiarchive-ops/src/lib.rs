//! File operations for digiarchive.
//!
//! This crate moves, copies and renames archive files:
//!
//! - [`FileOrganizer`] sorts a tree into `<root>/<field value>/` folders
//! - [`move_file`] is the single-file move used by the organizer
//! - [`backup_directory`] copies a whole tree
//! - [`rename_with_id`] tags a file name with a unique ID
//!
//! Bulk operations never stop on a single bad file: failures are collected
//! in the returned report next to the successful moves.
//!
//! ```rust,no_run
//! use digiarchive_ops::FileOrganizer;
//!
//! let report = FileOrganizer::new().organize("/path/to/archive", "type")?;
//! println!("{}", report.summary());
//! # Ok::<(), digiarchive_ops::ArchiveError>(())
//! ```

mod backup;
mod conflict;
mod move_op;
mod organize;
mod rename;

pub use backup::{BackupReport, backup_directory};
pub use conflict::{sanitize_component, unique_destination};
pub use move_op::move_file;
pub use organize::{
    FALLBACK_BUCKET, FileOrganizer, MovedFile, OrganizeConfig, OrganizeConfigBuilder,
    OrganizeReport, organize,
};
pub use rename::{rename_with_id, validate_filename};

// Re-export core types
pub use digiarchive_core::{ArchiveError, FileFailure, MetadataField};
