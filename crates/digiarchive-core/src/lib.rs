//! Core types for digiarchive.
//!
//! This crate provides the building blocks shared by the rest of the
//! workspace: file metadata snapshots, streaming checksums, the
//! record/collection model, walk configuration and the error taxonomy.
//!
//! ```rust,no_run
//! use digiarchive_core::{compute_checksum, ArchiveRecord, ArchiveCollection, HashAlgorithm};
//!
//! let record = ArchiveRecord::from_path("thesis.pdf")?.with_author("Manasa");
//! let mut collection = ArchiveCollection::new("Research")?;
//! collection.add(record);
//!
//! let sum = compute_checksum("thesis.pdf", HashAlgorithm::Sha256)?;
//! println!("{} bytes, {}", collection.total_size(), sum.digest);
//! # Ok::<(), digiarchive_core::ArchiveError>(())
//! ```

mod checksum;
mod collection;
mod config;
mod error;
mod item;
mod metadata;
mod record;
mod util;

pub use checksum::{CHUNK_SIZE, ChecksumResult, HashAlgorithm, checksum, compute_checksum};
pub use collection::ArchiveCollection;
pub use config::{WalkConfig, WalkConfigBuilder};
pub use error::{ArchiveError, FailureKind, FileFailure, Result};
pub use item::{ArchiveItem, total_size_of};
pub use metadata::{
    FileMetadata, MetadataField, extract_metadata, file_extension, validate_file_format,
    validate_metadata_fields,
};
pub use record::ArchiveRecord;
pub use util::{format_file_size, generate_unique_id};
