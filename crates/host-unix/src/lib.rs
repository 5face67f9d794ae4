use freespace_core::{CounterWidth, FilesystemStatError, FilesystemStats, StatsProvider};
use std::path::Path;

#[cfg(unix)]
mod statvfs;
#[cfg(not(unix))]
#[path = "statvfs_stub.rs"]
mod statvfs;

/// Block statistics from the widest `statvfs`-family call the host offers:
/// `statfs` on macOS, `statvfs64` on 32-bit Linux/Android, `statvfs` elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatvfsProvider;

impl StatvfsProvider {
    /// Width of the block counters this host's `statvfs` returns.
    pub fn counter_width(&self) -> CounterWidth {
        statvfs::counter_width()
    }
}

impl StatsProvider for StatvfsProvider {
    fn stats(&self, path: &Path) -> Result<FilesystemStats, FilesystemStatError> {
        statvfs::query(path)
    }
}
