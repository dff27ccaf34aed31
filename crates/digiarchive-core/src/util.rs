//! Small helpers shared by the archive crates.

use uuid::Uuid;

/// Format a byte count in binary units (e.g. `1.50 KiB`).
pub fn format_file_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Generate a short identifier such as `FILE-3f9a01bc`.
pub fn generate_unique_id(prefix: &str) -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &uuid[..8])
}
