//! Analysis for digiarchive.
//!
//! - **Duplicate detection** - group files by checksum, optionally delete
//!   every copy but the first
//! - **Archive reports** - counts, total size, type breakdown, creation-month
//!   histogram and the largest files
//!
//! # Duplicate Detection
//!
//! Files are visited in sorted, depth-first order. The first file of each
//! duplicate set is the original; every later one is paired with it.
//!
//! ```rust,no_run
//! use digiarchive_analyze::DuplicateDetector;
//!
//! let report = DuplicateDetector::new().find_duplicates("/path/to/archive", false)?;
//! for pair in &report.pairs {
//!     println!("{} duplicates {}", pair.duplicate.display(), pair.original.display());
//! }
//! # Ok::<(), digiarchive_analyze::ArchiveError>(())
//! ```
//!
//! # Reports
//!
//! ```rust,no_run
//! use digiarchive_analyze::ReportGenerator;
//!
//! let report = ReportGenerator::new().write_report("/path/to/archive", "report.txt")?;
//! println!("{} files summarized", report.total_files);
//! # Ok::<(), digiarchive_analyze::ArchiveError>(())
//! ```

mod duplicates;
mod report;

pub use duplicates::{
    DuplicateConfig, DuplicateConfigBuilder, DuplicateDetector, DuplicateGroup, DuplicatePair,
    DuplicateReport, find_duplicates,
};
pub use report::{
    ArchiveReport, LargestFile, ReportConfig, ReportConfigBuilder, ReportGenerator, UNKNOWN_TYPE,
};

// Re-export core types
pub use digiarchive_core::{ArchiveError, FileFailure, HashAlgorithm};
