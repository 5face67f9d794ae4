use freespace_core::{FilesystemStatError, FilesystemStats, StatsProvider};
use std::path::Path;

#[cfg(windows)]
mod space;
#[cfg(not(windows))]
#[path = "space_stub.rs"]
mod space;

/// Free space from `GetDiskFreeSpaceExW`, expressed in clusters when the
/// cluster geometry divides the byte count evenly.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFreeSpaceProvider;

impl StatsProvider for DiskFreeSpaceProvider {
    fn stats(&self, path: &Path) -> Result<FilesystemStats, FilesystemStatError> {
        let (free_bytes, cluster_bytes) = space::free_space(path)?;
        Ok(split_into_blocks(free_bytes, cluster_bytes))
    }
}

pub fn split_into_blocks(free_bytes: u64, cluster_bytes: u64) -> FilesystemStats {
    if cluster_bytes == 0 || free_bytes % cluster_bytes != 0 {
        return FilesystemStats::wide(free_bytes, 1);
    }
    FilesystemStats::wide(free_bytes / cluster_bytes, cluster_bytes)
}
