//! digiarchive - digital archive management from the command line.
//!
//! Usage:
//!   darc info <FILE>                     Show file metadata
//!   darc checksum <FILE> [-a ALG]        Compute a checksum (md5, sha1, sha256)
//!   darc duplicates [PATH] [--remove]    Find (and optionally delete) duplicates
//!   darc organize [PATH] --by <FIELD>    Sort files into metadata subfolders
//!   darc report [PATH] [-o FILE]         Summarize an archive
//!   darc backup <SRC> <DST>              Copy a directory tree
//!
//! Set `RUST_LOG=debug` for per-file logging.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use digiarchive_analyze::{DuplicateConfig, DuplicateDetector, ReportConfig, ReportGenerator};
use digiarchive_core::{FileFailure, FileMetadata, HashAlgorithm, compute_checksum, format_file_size};
use digiarchive_ops::{FileOrganizer, backup_directory};

#[derive(Parser)]
#[command(
    name = "digiarchive",
    version,
    about = "Manage a digital archive of files",
    long_about = "digiarchive extracts file metadata, computes checksums, finds \
                  duplicate files, organizes files into metadata-named folders and \
                  writes archive reports."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show metadata for a file
    Info {
        /// File to inspect
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Compute a file checksum
    Checksum {
        /// File to hash
        path: PathBuf,

        /// Algorithm: md5, sha1 or sha256
        #[arg(short, long, default_value = "sha256")]
        algorithm: String,
    },

    /// Find duplicate files by content
    Duplicates {
        /// Directory to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Delete every copy except the first one found
        #[arg(long)]
        remove: bool,

        /// Algorithm: md5, sha1 or sha256
        #[arg(short, long, default_value = "sha256")]
        algorithm: String,

        /// Skip hidden files
        #[arg(long)]
        no_hidden: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Move files into subfolders named after a metadata field
    Organize {
        /// Directory to organize
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Field to group by: type, extension, created, modified, folder, name
        #[arg(short, long)]
        by: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Summarize an archive
    Report {
        /// Directory to summarize
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of largest files to list
        #[arg(short = 'n', long, default_value = "5")]
        top: usize,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Copy a directory tree
    Backup {
        /// Directory to back up
        source: PathBuf,

        /// Backup destination
        destination: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Info { path, format } => run_info(&path, format)?,
        Command::Checksum { path, algorithm } => run_checksum(&path, &algorithm)?,
        Command::Duplicates {
            path,
            remove,
            algorithm,
            no_hidden,
            format,
        } => run_duplicates(&path, remove, &algorithm, !no_hidden, format)?,
        Command::Organize { path, by, format } => run_organize(&path, &by, format)?,
        Command::Report {
            path,
            output,
            top,
            format,
        } => run_report(&path, output, top, format)?,
        Command::Backup {
            source,
            destination,
        } => run_backup(&source, &destination)?,
    }

    Ok(())
}

/// Print metadata for one file.
fn run_info(path: &Path, format: OutputFormat) -> Result<()> {
    let meta = FileMetadata::extract(path)
        .with_context(|| format!("Cannot read metadata for {}", path.display()))?;

    match format {
        OutputFormat::Text => {
            println!("Name:      {}", meta.name);
            println!(
                "Size:      {} ({} bytes)",
                format_file_size(meta.size_bytes),
                meta.size_bytes
            );
            println!(
                "Extension: {}",
                if meta.extension.is_empty() { "-" } else { &meta.extension }
            );
            println!("Folder:    {}", meta.folder.display());
            println!("Created:   {}", meta.created_at.format("%Y-%m-%d %H:%M:%S"));
            println!("Modified:  {}", meta.modified_at.format("%Y-%m-%d %H:%M:%S"));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&meta)?);
        }
    }

    Ok(())
}

/// Print `<digest>  <path>` like the coreutils *sum tools.
fn run_checksum(path: &Path, algorithm: &str) -> Result<()> {
    let algorithm = HashAlgorithm::parse(algorithm)?;
    let result = compute_checksum(path, algorithm)
        .with_context(|| format!("Cannot hash {}", path.display()))?;
    println!("{}  {}", result.digest, path.display());
    Ok(())
}

/// Run duplicate detection.
fn run_duplicates(
    path: &Path,
    remove: bool,
    algorithm: &str,
    include_hidden: bool,
    format: OutputFormat,
) -> Result<()> {
    let config = DuplicateConfig::builder()
        .algorithm(HashAlgorithm::parse(algorithm)?)
        .include_hidden(include_hidden)
        .build()?;

    info!(path = %path.display(), remove, "scanning for duplicates");

    let report = DuplicateDetector::with_config(config)
        .find_duplicates(path, remove)
        .context("Duplicate scan failed")?;

    match format {
        OutputFormat::Text => {
            println!();
            println!("{}", "─".repeat(70));
            println!(" Duplicate File Report");
            println!("{}", "─".repeat(70));
            println!();

            if report.groups.is_empty() {
                println!(" No duplicate files found ({} files scanned).", report.files_scanned);
            } else {
                println!(
                    " Found {} duplicate sets ({} extra copies)",
                    report.groups.len(),
                    report.pairs.len()
                );
                println!(" Total wasted space: {}", format_file_size(report.wasted_bytes));
                println!();

                for (i, group) in report.groups.iter().enumerate() {
                    println!(
                        " Set {} ({} files, {} each)",
                        i + 1,
                        group.count(),
                        format_file_size(group.size)
                    );
                    println!("   {}", group.original.display());
                    for dup in &group.duplicates {
                        println!("   {}", dup.display());
                    }
                    println!();
                }

                if remove {
                    println!(" Removed {} duplicate files.", report.removed_count());
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    print_failures(&report.failures);
    Ok(())
}

/// Organize a directory by a metadata field.
fn run_organize(path: &Path, field: &str, format: OutputFormat) -> Result<()> {
    info!(path = %path.display(), field, "organizing");
    let report = FileOrganizer::new()
        .organize(path, field)
        .with_context(|| format!("Cannot organize {}", path.display()))?;

    match format {
        OutputFormat::Text => {
            for moved in &report.moved {
                println!("{} -> {}", moved.from.display(), moved.to.display());
            }
            println!("{}", report.summary());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    print_failures(&report.failures);
    Ok(())
}

/// Generate an archive report.
fn run_report(path: &Path, output: Option<PathBuf>, top: usize, format: OutputFormat) -> Result<()> {
    let config = ReportConfig::builder().top_n(top).build()?;
    let generator = ReportGenerator::with_config(config);

    let report = match (&output, format) {
        (Some(output_path), OutputFormat::Text) => {
            let report = generator
                .write_report(path, output_path)
                .context("Report failed")?;
            eprintln!("Report written to {}", output_path.display());
            report
        }
        (Some(output_path), OutputFormat::Json) => {
            let report = generator.generate(path).context("Report failed")?;
            std::fs::write(output_path, serde_json::to_string_pretty(&report)?)
                .with_context(|| format!("Cannot write {}", output_path.display()))?;
            eprintln!("Report written to {}", output_path.display());
            report
        }
        (None, OutputFormat::Text) => {
            let report = generator.generate(path).context("Report failed")?;
            print!("{}", report.render());
            report
        }
        (None, OutputFormat::Json) => {
            let report = generator.generate(path).context("Report failed")?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            report
        }
    };

    print_failures(&report.failures);
    Ok(())
}

/// Back up a directory tree.
fn run_backup(source: &Path, destination: &Path) -> Result<()> {
    info!(source = %source.display(), destination = %destination.display(), "starting backup");
    let report = backup_directory(source, destination)
        .with_context(|| format!("Cannot back up {}", source.display()))?;

    println!(
        "Copied {} files ({}) to {}",
        report.files_copied,
        format_file_size(report.bytes_copied),
        destination.display()
    );

    print_failures(&report.failures);
    Ok(())
}

fn print_failures(failures: &[FileFailure]) {
    if failures.is_empty() {
        return;
    }
    eprintln!();
    eprintln!("{} file(s) skipped:", failures.len());
    for failure in failures {
        eprintln!("  warning: {failure}");
    }
}
