//! Capability trait shared by records and collections.

/// Anything in the archive that can describe itself and report a size.
pub trait ArchiveItem {
    /// Multi-line human-readable description.
    fn display_info(&self) -> String;

    /// Size in bytes (aggregate for containers).
    fn calculate_size(&self) -> u64;
}

/// Sum the sizes of heterogeneous archive items.
pub fn total_size_of(items: &[&dyn ArchiveItem]) -> u64 {
    items.iter().map(|item| item.calculate_size()).sum()
}
