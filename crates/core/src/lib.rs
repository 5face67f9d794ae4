use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;

mod error;
mod format;
mod query;

pub use error::{ErrorKind, FilesystemStatError};
pub use format::format_bytes;
pub use query::FreeSpaceQuery;

pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StorageTarget {
    /// Shared storage visible to the user (sdcard, home directory).
    External,
    /// App-private data storage.
    Internal,
}

impl StorageTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageTarget::External => "external",
            StorageTarget::Internal => "internal",
        }
    }
}

impl fmt::Display for StorageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Width of the block counters the host handed back.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CounterWidth {
    Narrow,
    Wide,
}

impl CounterWidth {
    /// Picks the accessor from the byte width of the platform counter type.
    pub fn from_counter_bytes(bytes: usize) -> Self {
        if bytes >= 8 {
            CounterWidth::Wide
        } else {
            CounterWidth::Narrow
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilesystemStats {
    pub available_blocks: u64,
    pub block_size: u64,
    pub width: CounterWidth,
}

impl FilesystemStats {
    /// Stats read through a 32-bit accessor.
    pub fn narrow(available_blocks: u32, block_size: u32) -> Self {
        Self {
            available_blocks: u64::from(available_blocks),
            block_size: u64::from(block_size),
            width: CounterWidth::Narrow,
        }
    }

    pub fn wide(available_blocks: u64, block_size: u64) -> Self {
        Self {
            available_blocks,
            block_size,
            width: CounterWidth::Wide,
        }
    }

    /// Free bytes, multiplied in a 128-bit intermediate.
    pub fn available_bytes(&self) -> Result<u64, FilesystemStatError> {
        let product = u128::from(self.available_blocks) * u128::from(self.block_size);
        u64::try_from(product).map_err(|_| FilesystemStatError::Overflow {
            available_blocks: self.available_blocks,
            block_size: self.block_size,
        })
    }
}

/// Maps a storage target to the root directory of its filesystem.
///
/// `Ok(None)` means the platform has no such root right now (e.g. shared
/// storage not mounted).
pub trait PathResolver: Send + Sync {
    fn resolve(&self, target: StorageTarget) -> Result<Option<PathBuf>, FilesystemStatError>;
}

/// Reads block statistics for the filesystem containing `path`.
pub trait StatsProvider: Send + Sync {
    fn stats(&self, path: &Path) -> Result<FilesystemStats, FilesystemStatError>;
}

impl<T: PathResolver + ?Sized> PathResolver for &T {
    fn resolve(&self, target: StorageTarget) -> Result<Option<PathBuf>, FilesystemStatError> {
        (**self).resolve(target)
    }
}

impl<T: StatsProvider + ?Sized> StatsProvider for &T {
    fn stats(&self, path: &Path) -> Result<FilesystemStats, FilesystemStatError> {
        (**self).stats(path)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FreeSpaceReport {
    pub schema_version: String,
    pub target: StorageTarget,
    pub path: PathBuf,
    pub available_blocks: u64,
    pub block_size: u64,
    pub counter_width: CounterWidth,
    pub available_bytes: u64,
    pub queried_at_utc: String,
}

pub fn now_utc_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplies_blocks_by_block_size() {
        let stats = FilesystemStats::wide(1000, 4096);
        assert_eq!(stats.available_bytes().unwrap(), 4_096_000);
    }

    #[test]
    fn narrow_counters_do_not_truncate_the_product() {
        let stats = FilesystemStats::narrow(u32::MAX, 4096);
        assert_eq!(stats.width, CounterWidth::Narrow);
        assert_eq!(stats.available_bytes().unwrap(), 4_294_967_295u64 * 4096);
        assert!(stats.available_bytes().unwrap() > u64::from(u32::MAX));
    }

    #[test]
    fn zero_blocks_is_a_real_answer() {
        let stats = FilesystemStats::wide(0, 4096);
        assert_eq!(stats.available_bytes().unwrap(), 0);
    }

    #[test]
    fn product_past_u64_is_an_error() {
        let stats = FilesystemStats::wide(u64::MAX, 2);
        let err = stats.available_bytes().unwrap_err();
        assert!(matches!(err, FilesystemStatError::Overflow { .. }));
    }

    #[test]
    fn largest_fitting_product_is_exact() {
        let stats = FilesystemStats::wide(u64::MAX, 1);
        assert_eq!(stats.available_bytes().unwrap(), u64::MAX);
    }

    #[test]
    fn counter_width_follows_type_size() {
        assert_eq!(CounterWidth::from_counter_bytes(4), CounterWidth::Narrow);
        assert_eq!(CounterWidth::from_counter_bytes(8), CounterWidth::Wide);
    }

    #[test]
    fn target_serializes_lowercase() {
        let json = serde_json::to_string(&StorageTarget::External).unwrap();
        assert_eq!(json, "\"external\"");
        assert_eq!(StorageTarget::Internal.to_string(), "internal");
    }
}
