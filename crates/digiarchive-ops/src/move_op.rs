//! Single-file moves.

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use digiarchive_core::{ArchiveError, Result};

/// Move one file, returning its size.
///
/// Uses `rename`, which is atomic within a volume. Only when the rename
/// fails because source and destination are on different devices does it
/// fall back to copy, sync, then delete of the source.
pub fn move_file(source: &Path, dest: &Path) -> Result<u64> {
    let size = fs::metadata(source)
        .map_err(|e| ArchiveError::io(source, e))?
        .len();

    match fs::rename(source, dest) {
        Ok(()) => Ok(size),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            debug!(
                source = %source.display(),
                dest = %dest.display(),
                "cross-device move, copying"
            );
            copy_then_remove(source, dest)?;
            Ok(size)
        }
        Err(e) => Err(ArchiveError::io(source, e)),
    }
}

fn copy_then_remove(source: &Path, dest: &Path) -> Result<()> {
    fs::copy(source, dest).map_err(|e| ArchiveError::io(dest, e))?;
    File::open(dest)
        .and_then(|f| f.sync_all())
        .map_err(|e| ArchiveError::io(dest, e))?;
    fs::remove_file(source).map_err(|e| ArchiveError::io(source, e))
}
