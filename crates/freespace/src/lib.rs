//! Free space of the external or internal storage root, measured on the
//! host filesystem.
//!
//! ```no_run
//! use freespace::StorageTarget;
//!
//! let bytes = freespace::available_space(StorageTarget::Internal)?;
//! println!("{}", freespace::format_bytes(bytes));
//! # Ok::<(), freespace::FilesystemStatError>(())
//! ```

pub mod config;
mod roots;

pub use config::{ConfiguredResolver, RootConfig};
pub use freespace_core::{
    format_bytes, CounterWidth, ErrorKind, FilesystemStatError, FilesystemStats,
    FreeSpaceQuery, FreeSpaceReport, PathResolver, StatsProvider, StorageTarget,
};
pub use roots::PlatformResolver;

#[cfg(windows)]
pub type HostStatsProvider = freespace_host_windows::DiskFreeSpaceProvider;
#[cfg(not(windows))]
pub type HostStatsProvider = freespace_host_unix::StatvfsProvider;

pub type HostQuery = FreeSpaceQuery<ConfiguredResolver<PlatformResolver>, HostStatsProvider>;

/// Query bound to this host's root lookup and stat call, with `config`
/// roots taking precedence.
pub fn host_query(config: RootConfig) -> HostQuery {
    FreeSpaceQuery::new(
        ConfiguredResolver::new(config, PlatformResolver),
        HostStatsProvider::default(),
    )
}

/// Free bytes on `target`, honoring the root override environment variables.
pub fn available_space(target: StorageTarget) -> Result<u64, FilesystemStatError> {
    host_query(RootConfig::from_env()).available_space(target)
}

pub fn inspect(target: StorageTarget) -> Result<FreeSpaceReport, FilesystemStatError> {
    host_query(RootConfig::from_env()).inspect(target)
}
