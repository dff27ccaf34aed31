//! Streaming file checksums.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use strum::{Display, EnumIter, EnumString};

use crate::error::{ArchiveError, Result};

/// Bytes read per chunk while hashing.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Supported checksum algorithms.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    #[default]
    Sha256,
}

impl HashAlgorithm {
    /// Parse an algorithm name.
    pub fn parse(name: &str) -> Result<Self> {
        name.trim()
            .parse()
            .map_err(|_| ArchiveError::UnsupportedAlgorithm {
                name: name.to_string(),
            })
    }

    /// Length of the hex digest produced by this algorithm.
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha1 => 40,
            Self::Sha256 => 64,
        }
    }

    fn hasher(&self) -> FileHasher {
        match self {
            Self::Md5 => FileHasher::Md5(md5::Context::new()),
            Self::Sha1 => FileHasher::Sha1(Sha1::new()),
            Self::Sha256 => FileHasher::Sha256(Sha256::new()),
        }
    }
}

/// Digest of a file under one algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChecksumResult {
    /// Algorithm used.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex digest.
    pub digest: String,
}

impl std::fmt::Display for ChecksumResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.digest)
    }
}

enum FileHasher {
    Md5(md5::Context),
    Sha1(Sha1),
    Sha256(Sha256),
}

impl FileHasher {
    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Md5(ctx) => ctx.consume(data),
            Self::Sha1(h) => h.update(data),
            Self::Sha256(h) => h.update(data),
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            Self::Md5(ctx) => format!("{:x}", ctx.compute()),
            Self::Sha1(h) => hex::encode(h.finalize()),
            Self::Sha256(h) => hex::encode(h.finalize()),
        }
    }
}

/// Compute a checksum by streaming the file in fixed-size chunks.
pub fn compute_checksum(path: impl AsRef<Path>, algorithm: HashAlgorithm) -> Result<ChecksumResult> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| ArchiveError::io(path, e))?;

    let mut hasher = algorithm.hasher();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let bytes_read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ArchiveError::io(path, e)),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(ChecksumResult {
        algorithm,
        digest: hasher.finalize_hex(),
    })
}

/// Compute a checksum for an algorithm given by name.
///
/// The name is validated before the file is opened.
pub fn checksum(path: impl AsRef<Path>, algorithm: &str) -> Result<ChecksumResult> {
    let algorithm = HashAlgorithm::parse(algorithm)?;
    compute_checksum(path, algorithm)
}
